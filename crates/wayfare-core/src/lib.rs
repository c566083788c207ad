//! wayfare-core
//!
//! Application form and submission-reconciliation engine.
//! Depends on wayfare-domain. No terminal I/O, no direct network or filesystem access:
//! every backend interaction goes through the [`ports`] traits.

pub mod catalog;
pub mod error;
pub mod filter_service;
pub mod form_state;
pub mod options_service;
pub mod payload_service;
pub mod planner_service;
pub mod ports;
pub mod profile;
pub mod reconcile_service;
pub mod session;
pub mod time;
pub mod validation_service;
pub mod wizard;

pub use error::{CoreError, FieldErrors, TransportError};
pub use filter_service::*;
pub use form_state::*;
pub use options_service::*;
pub use payload_service::*;
pub use planner_service::*;
pub use ports::*;
pub use profile::*;
pub use reconcile_service::*;
pub use session::*;
pub use time::*;
pub use validation_service::*;
pub use wizard::*;
