//! Offer records, offer kinds, and the JSON value helpers used to inspect them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The service families an applicant can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferKind {
    StudyVisa,
    WorkVisa,
    Pilgrimage,
    Vacation,
    Hotel,
}

impl OfferKind {
    pub const ALL: [OfferKind; 5] = [
        OfferKind::StudyVisa,
        OfferKind::WorkVisa,
        OfferKind::Pilgrimage,
        OfferKind::Vacation,
        OfferKind::Hotel,
    ];

    /// URL segment used to build `/{domain}-offer/` and `/{domain}-application/`.
    pub fn domain(self) -> &'static str {
        match self {
            OfferKind::StudyVisa => "study-visa",
            OfferKind::WorkVisa => "work-visa",
            OfferKind::Pilgrimage => "pilgrimage",
            OfferKind::Vacation => "vacation",
            OfferKind::Hotel => "hotel",
        }
    }

    pub fn from_domain(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        OfferKind::ALL
            .into_iter()
            .find(|kind| kind.domain() == normalized)
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OfferKind::StudyVisa => "Study visa",
            OfferKind::WorkVisa => "Work visa",
            OfferKind::Pilgrimage => "Pilgrimage",
            OfferKind::Vacation => "Vacation",
            OfferKind::Hotel => "Hotel",
        };
        f.write_str(label)
    }
}

/// Opaque offer instance as returned by the upstream service. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferRecord(Map<String, Value>);

impl OfferRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Accepts only JSON objects; any other shape is not an offer.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Walks nested objects along `path`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.0.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    /// Returns true when the offer carries a truthy value under `key`.
    pub fn provides(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn id(&self) -> Option<String> {
        self.get("id").and_then(scalar_key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Mirrors the upstream truthiness convention for optional JSON values.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Normalizes a scalar identifier (string or number) into a comparable key.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// One entry of a reference-data dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}
