//! Declarative field and step descriptors shared by every offer type.

use std::fmt;

use serde::Serialize;

/// Enumerates the data kinds an application field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Date,
    Boolean,
    File,
    Select,
    TextArea,
}

impl FieldKind {
    /// Returns true when values of this kind are carried as plain strings.
    pub fn is_scalar(self) -> bool {
        !matches!(self, FieldKind::Boolean | FieldKind::File)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::File => "file",
            FieldKind::Select => "select",
            FieldKind::TextArea => "textarea",
        };
        f.write_str(label)
    }
}

/// Declarative description of a single application field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Reference-data source backing a `Select` field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static str>,
    /// Numeric sub-field; serialized as a canonical number string.
    pub numeric: bool,
    /// Read-only field derived from the authenticated identity.
    pub identity: bool,
}

impl FieldSpec {
    pub fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
            options: None,
            numeric: false,
            identity: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_options(mut self, source: &'static str) -> Self {
        self.options = Some(source);
        self
    }

    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }
}

/// Statically declared wizard step referencing catalog fields by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSpec {
    pub label: &'static str,
    pub field_names: Vec<&'static str>,
}

impl StepSpec {
    pub fn new(label: &'static str, field_names: &[&'static str]) -> Self {
        Self {
            label,
            field_names: field_names.to_vec(),
        }
    }
}

/// A wizard step after filtering, holding the concrete fields it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStep {
    pub label: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl ResolvedStep {
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }
}
