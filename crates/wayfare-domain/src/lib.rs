//! wayfare-domain
//!
//! Pure domain models (fields, steps, offers, applications, identities, payloads).
//! No I/O, no transport, no storage. Only data types and core enums.

pub mod application;
pub mod field;
pub mod identity;
pub mod offer;
pub mod value;

pub use application::*;
pub use field::*;
pub use identity::*;
pub use offer::*;
pub use value::*;
