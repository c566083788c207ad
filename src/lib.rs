#![doc(test(attr(deny(warnings))))]

//! Wayfare Portal wires the application engine to a configured backend and the
//! authenticated identity, and opens one [`ApplicationSession`] per offer visit.
//!
//! [`ApplicationSession`]: wayfare_core::ApplicationSession

pub mod errors;
pub mod portal;
pub mod reveal;
pub mod utils;

pub use errors::PortalError;
pub use portal::Portal;
pub use reveal::{RevealFrame, RevealHandle, TypingReveal};

use std::sync::Once;

use wayfare_config::Config;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing with the default configuration.
pub fn init() {
    init_with(&Config::default());
}

/// Initializes global tracing with `config.log_filter` as the default directive and
/// emits a startup info log. Only the first call has any effect.
pub fn init_with(config: &Config) {
    INIT_TRACING.call_once(|| {
        let filter = utils::init_tracing_with(&config.log_filter);
        tracing::info!(%filter, "Wayfare portal tracing initialized.");
    });
}
