use serde::{de::Deserializer, Deserialize, Serialize};
use std::fmt;

/// Engine settings shared by every application session of a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "Config::default_log_filter")]
    pub log_filter: String,
    /// Upper bound on `next` links followed while looking up existing applications.
    #[serde(default = "Config::default_max_application_pages")]
    pub max_application_pages: u32,
    #[serde(default)]
    pub reconcile_failure: ReconcileFailure,
    #[serde(default = "Config::default_select_placeholder_label")]
    pub select_placeholder_label: String,
    #[serde(default = "Config::default_other_option_label")]
    pub other_option_label: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: Self::default_log_filter(),
            max_application_pages: Self::default_max_application_pages(),
            reconcile_failure: ReconcileFailure::default(),
            select_placeholder_label: Self::default_select_placeholder_label(),
            other_option_label: Self::default_other_option_label(),
        }
    }
}

impl Config {
    pub fn default_log_filter() -> String {
        "wayfare_portal=info".into()
    }

    pub fn default_max_application_pages() -> u32 {
        10
    }

    pub fn default_select_placeholder_label() -> String {
        "Please select".into()
    }

    pub fn default_other_option_label() -> String {
        "Other".into()
    }

    /// Returns the first problem that would make the engine misbehave.
    pub fn problems(&self) -> Option<String> {
        if self.log_filter.trim().is_empty() {
            return Some("log_filter must not be empty".into());
        }
        if self.max_application_pages == 0 {
            return Some("max_application_pages must be at least 1".into());
        }
        if self.other_option_label.trim().is_empty() {
            return Some("other_option_label must not be empty".into());
        }
        None
    }
}

/// What the applicant sees when the existing-application lookup fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileFailure {
    ShowForm,
    Block,
}

impl ReconcileFailure {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| ReconcileFailure::from_str(v.trim()))
            .unwrap_or_default()
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "block" | "blocked" => ReconcileFailure::Block,
            _ => ReconcileFailure::ShowForm,
        }
    }
}

impl Default for ReconcileFailure {
    fn default() -> Self {
        ReconcileFailure::ShowForm
    }
}

impl fmt::Display for ReconcileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReconcileFailure::ShowForm => "show-form",
            ReconcileFailure::Block => "block",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for ReconcileFailure {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(ReconcileFailure::from_value(value))
    }
}
