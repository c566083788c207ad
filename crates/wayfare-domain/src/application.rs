//! Previously submitted applications as returned by the backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::offer::scalar_key;

/// Marker set on records synthesized locally right after a submission.
pub const LOCAL_MARKER: &str = "_local";

/// Immutable snapshot of a submitted application. Shapes vary between offer
/// types, so the record keeps the raw JSON object and exposes typed accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord(Map<String, Value>);

impl ApplicationRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Numeric identifier; numeric strings are accepted.
    pub fn id(&self) -> Option<i64> {
        match self.0.get("id")? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    /// Parses `submitted_at` as RFC 3339, a naive timestamp, or a bare date.
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.0.get("submitted_at")?.as_str()?.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(naive.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Resolves a linking key that is either a flat scalar or an object exposing `id`.
    pub fn linked_id(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Object(nested) => nested.get("id").and_then(scalar_key),
            other => scalar_key(other),
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// True for the optimistic stand-in created before the backend confirms.
    pub fn is_local(&self) -> bool {
        self.0
            .get(LOCAL_MARKER)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
