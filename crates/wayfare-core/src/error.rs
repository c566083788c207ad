use std::collections::BTreeMap;

use thiserror::Error;

/// Backend validation messages keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Failures reported by a [`crate::ports::PortalBackend`] implementation.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Request rejected: {}", summarize(.0))]
    Rejected(FieldErrors),
    #[error("Unexpected status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),
    #[error("Serialization failed: {0}")]
    Serialization(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}
