//! Reference-data dropdown options.

use serde_json::Value;
use tracing::warn;
use wayfare_domain::{scalar_key, SelectOption};

use crate::{ports::PortalBackend, profile::OfferProfile};

pub const OTHER_OPTION_VALUE: &str = "other";

/// Labels for the synthetic entries added around backend options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLabels {
    pub placeholder: String,
    pub other: String,
}

impl Default for OptionLabels {
    fn default() -> Self {
        Self {
            placeholder: "Please select".into(),
            other: "Other".into(),
        }
    }
}

pub struct OptionsService;

impl OptionsService {
    /// Maps `{ results: [{ id, term }] }` (or a bare array) to select options with the
    /// placeholder first. Falls back to a single `Other` choice when nothing maps.
    pub fn map_options(raw: &Value, labels: &OptionLabels) -> Vec<SelectOption> {
        let items: &[Value] = match raw {
            Value::Array(items) => items.as_slice(),
            Value::Object(map) => map
                .get("results")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        };

        let mapped: Vec<SelectOption> = items.iter().filter_map(map_item).collect();
        if mapped.is_empty() {
            return Self::fallback(labels);
        }

        let mut options = Vec::with_capacity(mapped.len() + 1);
        options.push(SelectOption::new("", labels.placeholder.clone()));
        options.extend(mapped);
        options
    }

    pub fn fallback(labels: &OptionLabels) -> Vec<SelectOption> {
        vec![
            SelectOption::new("", labels.placeholder.clone()),
            SelectOption::new(OTHER_OPTION_VALUE, labels.other.clone()),
        ]
    }

    /// Fetches and maps options for `source`; load failures degrade to the fallback list.
    pub fn load(backend: &dyn PortalBackend, source: &str, labels: &OptionLabels) -> Vec<SelectOption> {
        let endpoint = OfferProfile::options_endpoint(source);
        match backend.fetch_options(&endpoint) {
            Ok(raw) => Self::map_options(&raw, labels),
            Err(err) => {
                warn!(source, error = %err, "options fetch failed; using fallback list");
                Self::fallback(labels)
            }
        }
    }
}

fn map_item(item: &Value) -> Option<SelectOption> {
    let object = item.as_object()?;
    let value = object.get("id").and_then(scalar_key)?;
    let label = ["term", "name", "label"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|label| !label.is_empty())?;
    Some(SelectOption::new(value, label))
}
