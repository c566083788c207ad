//! Mutable field values owned by one wizard session.

use std::collections::BTreeMap;

use tracing::debug;
use wayfare_domain::{FieldKind, FieldSpec, FieldValue, FileHandle, Identity};

use crate::CoreError;

/// Values derived from the authenticated identity when the form (re)initializes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDefaults {
    pub display_name: String,
}

impl From<&Identity> for IdentityDefaults {
    fn from(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name(),
        }
    }
}

/// Raw input as delivered by a UI control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputEvent {
    pub value: String,
    pub checked: bool,
    pub files: Vec<FileHandle>,
}

impl InputEvent {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            checked,
            ..Self::default()
        }
    }

    pub fn files(files: Vec<FileHandle>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    catalog: Vec<FieldSpec>,
    values: BTreeMap<String, FieldValue>,
    identity_name: String,
}

impl FormState {
    pub fn new(catalog: &[FieldSpec], defaults: &IdentityDefaults) -> Self {
        let mut state = Self {
            catalog: catalog.to_vec(),
            values: BTreeMap::new(),
            identity_name: String::new(),
        };
        state.reset(defaults);
        state
    }

    /// Restores every field to its initial value.
    pub fn reset(&mut self, defaults: &IdentityDefaults) {
        self.identity_name = defaults.display_name.trim().to_string();
        self.values = self
            .catalog
            .iter()
            .map(|field| (field.name.to_string(), self.initial_value(field)))
            .collect();
        debug!(fields = self.values.len(), "form state reset");
    }

    /// Applies a UI event, extracting the part of the event that matches the field kind.
    pub fn set_field(&mut self, name: &str, event: InputEvent) -> Result<(), CoreError> {
        let field = self.writable_field(name)?;
        let value = match field.kind {
            FieldKind::File => FieldValue::File(event.files.into_iter().next()),
            FieldKind::Boolean => FieldValue::Bool(event.checked),
            _ => FieldValue::Text(event.value),
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    /// Stores a value as-is. Shape mismatches surface when the payload is serialized.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), CoreError> {
        self.writable_field(name)?;
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn clear_field(&mut self, name: &str) -> Result<(), CoreError> {
        let field = self.writable_field(name)?.clone();
        let initial = self.initial_value(&field);
        self.values.insert(name.to_string(), initial);
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// Display name tracked by the read-only identity field.
    pub fn identity_name(&self) -> &str {
        &self.identity_name
    }

    fn writable_field(&self, name: &str) -> Result<&FieldSpec, CoreError> {
        let field = self
            .catalog
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| CoreError::UnknownField(name.to_string()))?;
        if field.identity {
            return Err(CoreError::ReadOnlyField(name.to_string()));
        }
        Ok(field)
    }

    fn initial_value(&self, field: &FieldSpec) -> FieldValue {
        if field.identity {
            return FieldValue::Text(self.identity_name.clone());
        }
        match field.kind {
            FieldKind::Boolean => FieldValue::Bool(false),
            FieldKind::File => FieldValue::File(None),
            _ => FieldValue::Text(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::OfferProfile;

    fn state() -> FormState {
        let profile = OfferProfile::study_visa();
        let defaults = IdentityDefaults {
            display_name: "Amina Okafor".into(),
        };
        FormState::new(&profile.catalog, &defaults)
    }

    #[test]
    fn set_field_dispatches_on_kind() {
        let mut form = state();
        let passport = FileHandle::new("passport.pdf", "application/pdf", vec![1, 2, 3]);
        let extra = FileHandle::new("other.pdf", "application/pdf", vec![4]);

        form.set_field("passport_copy", InputEvent::files(vec![passport.clone(), extra]))
            .unwrap();
        form.set_field("has_previous_refusal", InputEvent::checked(true))
            .unwrap();
        form.set_field("passport_number", InputEvent::text("A1234567"))
            .unwrap();

        assert_eq!(
            form.value("passport_copy"),
            Some(&FieldValue::File(Some(passport)))
        );
        assert_eq!(
            form.value("has_previous_refusal"),
            Some(&FieldValue::Bool(true))
        );
        assert_eq!(
            form.value("passport_number"),
            Some(&FieldValue::Text("A1234567".into()))
        );
    }

    #[test]
    fn empty_file_selection_clears_the_field() {
        let mut form = state();
        form.set_field(
            "transcript",
            InputEvent::files(vec![FileHandle::new("t.pdf", "application/pdf", vec![])]),
        )
        .unwrap();
        form.set_field("transcript", InputEvent::files(Vec::new()))
            .unwrap();
        assert_eq!(form.value("transcript"), Some(&FieldValue::File(None)));
    }

    #[test]
    fn identity_field_is_read_only() {
        let mut form = state();
        let err = form
            .set_field("applicant", InputEvent::text("Someone Else"))
            .expect_err("identity field must reject writes");
        assert!(matches!(err, CoreError::ReadOnlyField(_)));
        assert_eq!(
            form.value("applicant"),
            Some(&FieldValue::Text("Amina Okafor".into()))
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut form = state();
        assert!(matches!(
            form.set_field("shoe_size", InputEvent::text("42")),
            Err(CoreError::UnknownField(_))
        ));
    }

    #[test]
    fn reset_restores_initial_values_and_tracks_new_identity() {
        let mut form = state();
        form.set_field("nationality", InputEvent::text("Nigerian"))
            .unwrap();
        form.set_field("has_previous_refusal", InputEvent::checked(true))
            .unwrap();

        form.reset(&IdentityDefaults {
            display_name: "Amina O. Okafor".into(),
        });

        assert_eq!(
            form.value("nationality"),
            Some(&FieldValue::Text(String::new()))
        );
        assert_eq!(
            form.value("has_previous_refusal"),
            Some(&FieldValue::Bool(false))
        );
        assert_eq!(form.identity_name(), "Amina O. Okafor");
        assert_eq!(
            form.value("applicant"),
            Some(&FieldValue::Text("Amina O. Okafor".into()))
        );
    }
}
