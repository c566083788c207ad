use std::{collections::HashMap, sync::Arc};

use tracing::info;
use wayfare_config::{Config, ReconcileFailure};
use wayfare_core::{
    ApplicationSession, Clock, IdentityProvider, OfferProfile, OptionLabels, PortalBackend,
    ReconcileFailurePolicy, SessionOptions, SubmitOutcome, SystemClock,
};
use wayfare_domain::{Identity, OfferKind};

use crate::PortalError;

/// Opens application sessions for the authenticated user against one backend.
pub struct Portal<B, I> {
    backend: B,
    identity: I,
    config: Config,
    profiles: HashMap<OfferKind, Arc<OfferProfile>>,
    clock: Arc<dyn Clock>,
}

impl<B: PortalBackend, I: IdentityProvider> Portal<B, I> {
    /// Builds the portal with the built-in profile of every offer type, rejecting any
    /// profile that fails verification.
    pub fn new(backend: B, identity: I, config: Config) -> Result<Self, PortalError> {
        let mut profiles = HashMap::new();
        for kind in OfferKind::ALL {
            let profile = OfferProfile::for_kind(kind);
            profile.verify()?;
            profiles.insert(kind, Arc::new(profile));
        }
        Ok(Self {
            backend,
            identity,
            config,
            profiles,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the profile used for its offer type.
    pub fn with_profile(mut self, profile: OfferProfile) -> Result<Self, PortalError> {
        profile.verify()?;
        self.profiles.insert(profile.kind, Arc::new(profile));
        Ok(self)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_application_pages: self.config.max_application_pages.max(1),
            reconcile_failure: match self.config.reconcile_failure {
                ReconcileFailure::ShowForm => ReconcileFailurePolicy::ShowForm,
                ReconcileFailure::Block => ReconcileFailurePolicy::Block,
            },
            labels: OptionLabels {
                placeholder: self.config.select_placeholder_label.clone(),
                other: self.config.other_option_label.clone(),
            },
        }
    }

    fn current_user(&self) -> Result<Identity, PortalError> {
        self.identity
            .current_user()
            .ok_or(PortalError::NotAuthenticated)
    }

    fn profile(&self, kind: OfferKind) -> Result<Arc<OfferProfile>, PortalError> {
        self.profiles
            .get(&kind)
            .cloned()
            .ok_or_else(|| PortalError::UnknownOfferKind(kind.to_string()))
    }

    /// Opens and loads a session for `offer_id`.
    pub fn open(&self, kind: OfferKind, offer_id: &str) -> Result<ApplicationSession, PortalError> {
        let identity = self.current_user()?;
        let mut session = ApplicationSession::new(
            self.profile(kind)?,
            offer_id,
            identity,
            self.session_options(),
        );
        session.load(&self.backend);
        info!(
            session = %session.id(),
            domain = kind.domain(),
            offer_id,
            view = ?session.view_mode(),
            "application session opened"
        );
        Ok(session)
    }

    /// Like [`Portal::open`], addressing the offer type by its URL slug (`study-visa`, ...).
    pub fn open_domain(
        &self,
        domain: &str,
        offer_id: &str,
    ) -> Result<ApplicationSession, PortalError> {
        let kind = OfferKind::from_domain(domain)
            .ok_or_else(|| PortalError::UnknownOfferKind(domain.to_string()))?;
        self.open(kind, offer_id)
    }

    pub fn reload(&self, session: &mut ApplicationSession) {
        session.load(&self.backend);
    }

    /// Re-reads the authenticated identity; when it changed, the session is reset and
    /// reloaded for the new user. Returns whether a change was applied.
    pub fn sync_identity(&self, session: &mut ApplicationSession) -> Result<bool, PortalError> {
        let identity = self.current_user()?;
        if &identity == session.identity() {
            return Ok(false);
        }
        info!(session = %session.id(), "identity changed; reloading session");
        session.identity_changed(identity);
        session.load(&self.backend);
        Ok(true)
    }

    pub fn submit(&self, session: &mut ApplicationSession) -> SubmitOutcome {
        session.submit(&self.backend, self.clock.as_ref())
    }
}
