//! Seams to the collaborators the engine does not own: the transport and the
//! authenticated identity.

use serde_json::Value;
use wayfare_domain::{Identity, Payload};

use crate::TransportError;

/// Query for the caller's own applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationQuery {
    /// Server-side filter hint; backends may ignore it.
    pub offer_id: String,
    /// Continuation taken from a previous page's `next` link.
    pub page: Option<String>,
}

impl ApplicationQuery {
    pub fn for_offer(offer_id: impl Into<String>) -> Self {
        Self {
            offer_id: offer_id.into(),
            page: None,
        }
    }

    pub fn with_page(&self, page: impl Into<String>) -> Self {
        Self {
            offer_id: self.offer_id.clone(),
            page: Some(page.into()),
        }
    }
}

/// Abstraction over the portal REST API. Endpoints are fully formatted paths such as
/// `/study-visa-offer/7/` or `/study-visa-application/`.
pub trait PortalBackend: Send + Sync {
    fn fetch_offer(&self, endpoint: &str) -> Result<Value, TransportError>;
    fn fetch_options(&self, endpoint: &str) -> Result<Value, TransportError>;
    fn list_applications(
        &self,
        endpoint: &str,
        query: &ApplicationQuery,
    ) -> Result<Value, TransportError>;
    /// Sends a multipart submission. Returns the echoed record when the backend provides one.
    fn submit(&self, endpoint: &str, payload: &Payload) -> Result<Option<Value>, TransportError>;
}

/// Read-only view of the authenticated user.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<Identity>;

    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Fixed identity, useful for tests and single-user tools.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<Identity>);

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<Identity> {
        self.0.clone()
    }
}
