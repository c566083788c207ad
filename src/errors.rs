use thiserror::Error;
use wayfare_config::ConfigError;
use wayfare_core::CoreError;

/// Failures surfaced by the portal facade.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("No authenticated user")]
    NotAuthenticated,
    #[error("Unknown offer type: {0}")]
    UnknownOfferKind(String),
}
