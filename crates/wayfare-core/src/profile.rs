//! Per-offer-type configuration driving the generic engine.

use std::collections::{HashMap, HashSet};

use wayfare_domain::{is_truthy, FieldKind, FieldSpec, OfferKind, OfferRecord, StepSpec};

use crate::CoreError;

/// Declares where an offer may already carry a field's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferLookup {
    /// Sub-objects searched one level deep under the field's own name.
    pub nested_objects: Vec<&'static str>,
    /// Explicit alternate paths for individual fields.
    pub paths: Vec<(&'static str, Vec<&'static str>)>,
}

impl OfferLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nested(mut self, object: &'static str) -> Self {
        self.nested_objects.push(object);
        self
    }

    pub fn alias(mut self, field: &'static str, path: &[&'static str]) -> Self {
        self.paths.push((field, path.to_vec()));
        self
    }

    /// Returns true when `offer` supplies a truthy value for `name` directly, through a
    /// nested alias object, or through a declared alias path.
    pub fn provides(&self, offer: &OfferRecord, name: &str) -> bool {
        if offer.provides(name) {
            return true;
        }
        let nested = self.nested_objects.iter().any(|object| {
            offer
                .get_path(&[*object, name])
                .is_some_and(is_truthy)
        });
        if nested {
            return true;
        }
        self.paths
            .iter()
            .filter(|(field, _)| *field == name)
            .any(|(_, path)| offer.get_path(path).is_some_and(is_truthy))
    }
}

/// Keys linking an application record to its offer and to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkKeys {
    pub offer: &'static str,
    pub owner_id: &'static str,
    pub owner_name: &'static str,
}

impl Default for LinkKeys {
    fn default() -> Self {
        Self {
            offer: "offer",
            owner_id: "client",
            owner_name: "applicant",
        }
    }
}

/// Catalog, steps, offer lookup, and endpoints for one offer type.
#[derive(Debug, Clone)]
pub struct OfferProfile {
    pub kind: OfferKind,
    pub catalog: Vec<FieldSpec>,
    pub steps: Vec<StepSpec>,
    pub lookup: OfferLookup,
    pub links: LinkKeys,
}

impl OfferProfile {
    pub fn new(kind: OfferKind, catalog: Vec<FieldSpec>, steps: Vec<StepSpec>) -> Self {
        Self {
            kind,
            catalog,
            steps,
            lookup: OfferLookup::default(),
            links: LinkKeys::default(),
        }
    }

    pub fn with_lookup(mut self, lookup: OfferLookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_links(mut self, links: LinkKeys) -> Self {
        self.links = links;
        self
    }

    /// Built-in profile for `kind`.
    pub fn for_kind(kind: OfferKind) -> Self {
        match kind {
            OfferKind::StudyVisa => Self::study_visa(),
            OfferKind::WorkVisa => Self::work_visa(),
            OfferKind::Pilgrimage => Self::pilgrimage(),
            OfferKind::Vacation => Self::vacation(),
            OfferKind::Hotel => Self::hotel(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.catalog.iter().find(|field| field.name == name)
    }

    pub fn identity_field(&self) -> Option<&FieldSpec> {
        self.catalog.iter().find(|field| field.identity)
    }

    pub fn offer_endpoint(&self, offer_id: &str) -> String {
        format!("/{}-offer/{}/", self.kind.domain(), offer_id)
    }

    pub fn application_endpoint(&self) -> String {
        format!("/{}-application/", self.kind.domain())
    }

    pub fn options_endpoint(source: &str) -> String {
        format!("/{source}/options/")
    }

    /// Checks the static configuration. Violations are programming errors surfaced by tests.
    pub fn verify(&self) -> Result<(), CoreError> {
        let mut names = HashSet::new();
        for field in &self.catalog {
            if !names.insert(field.name) {
                return Err(self.invalid(format!("duplicate field `{}`", field.name)));
            }
            if field.kind == FieldKind::Select && field.options.is_none() {
                return Err(self.invalid(format!(
                    "select field `{}` has no options source",
                    field.name
                )));
            }
            if field.identity && field.kind != FieldKind::Text {
                return Err(self.invalid(format!(
                    "identity field `{}` must be text",
                    field.name
                )));
            }
            if field.numeric && !field.kind.is_scalar() {
                return Err(self.invalid(format!(
                    "numeric field `{}` must hold a scalar",
                    field.name
                )));
            }
        }

        if self.catalog.iter().filter(|field| field.identity).count() > 1 {
            return Err(self.invalid("more than one identity field".into()));
        }

        let mut placements: HashMap<&str, &str> = HashMap::new();
        for step in &self.steps {
            for name in &step.field_names {
                if !names.contains(name) {
                    return Err(self.invalid(format!(
                        "step `{}` references unknown field `{}`",
                        step.label, name
                    )));
                }
                if let Some(previous) = placements.insert(*name, step.label) {
                    return Err(self.invalid(format!(
                        "field `{}` placed in both `{}` and `{}`",
                        name, previous, step.label
                    )));
                }
            }
        }

        if let Some(orphan) = self
            .catalog
            .iter()
            .find(|field| !placements.contains_key(field.name))
        {
            return Err(self.invalid(format!(
                "field `{}` is not placed in any step",
                orphan.name
            )));
        }

        if let Some((field, _)) = self
            .lookup
            .paths
            .iter()
            .find(|(field, _)| !names.contains(field))
        {
            return Err(self.invalid(format!("alias declared for unknown field `{field}`")));
        }

        Ok(())
    }

    fn invalid(&self, detail: String) -> CoreError {
        CoreError::InvalidProfile(format!("{}: {}", self.kind.domain(), detail))
    }
}
