//! One applicant working through one offer's application.
//!
//! The session owns the form state and the wizard cursor, tracks the two independent
//! loads (offer and existing application), and decides which view is shown. Every load
//! result is applied through a [`LoadTicket`]; results carrying a stale ticket are
//! dropped so a retargeted or reloaded session never shows data fetched for an earlier
//! target.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wayfare_domain::{
    ApplicationRecord, FieldSpec, Identity, OfferRecord, Payload, ResolvedStep, SelectOption,
};

use crate::{
    filter_service::FieldFilter,
    form_state::{FormState, IdentityDefaults, InputEvent},
    options_service::{OptionLabels, OptionsService},
    payload_service::PayloadSerializer,
    planner_service::StepPlanner,
    ports::PortalBackend,
    profile::OfferProfile,
    reconcile_service::Reconciler,
    time::Clock,
    validation_service::StepValidator,
    wizard::{WizardCursor, WizardEvent},
    CoreError, FieldErrors, TransportError,
};

/// Message shown when a submission fails for reasons the applicant cannot fix field by field.
pub const GENERIC_SUBMIT_ERROR: &str =
    "We couldn't submit your application. Please try again in a moment.";

/// Identifies one issued load. Only results for the latest ticket of the same session apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub session: Uuid,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What the applicant currently sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Offer or existing-application lookup still outstanding.
    Loading,
    /// The offer could not be loaded; no form can be planned.
    Unavailable,
    /// The existing-application lookup failed and the policy forbids showing the form.
    Blocked,
    Form,
    /// A submitted application exists; read-only.
    Status,
}

/// Behaviour when the existing-application lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcileFailurePolicy {
    /// Show the form alongside an inline error.
    #[default]
    ShowForm,
    /// Show neither form nor status until a reload succeeds.
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub max_application_pages: u32,
    pub reconcile_failure: ReconcileFailurePolicy,
    pub labels: OptionLabels,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_application_pages: 10,
            reconcile_failure: ReconcileFailurePolicy::default(),
            labels: OptionLabels::default(),
        }
    }
}

/// Result of a submit request.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted,
    /// Another submission is in flight, or the form is not showing.
    Ignored,
    /// Required input is missing; the cursor moved back to `step`.
    Invalid {
        step: usize,
        missing: Vec<&'static str>,
    },
    /// The backend rejected individual fields.
    Rejected(FieldErrors),
    Failed(String),
}

/// A submission that passed local validation and awaits the transport.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: LoadTicket,
    pub endpoint: String,
    pub payload: Payload,
}

pub struct ApplicationSession {
    id: Uuid,
    generation: u64,
    profile: Arc<OfferProfile>,
    offer_id: String,
    identity: Identity,
    options: SessionOptions,
    offer: LoadState<OfferRecord>,
    existing: LoadState<Option<ApplicationRecord>>,
    fields: Option<Vec<FieldSpec>>,
    steps: Vec<ResolvedStep>,
    cursor: WizardCursor,
    form: FormState,
    select_options: BTreeMap<String, Vec<SelectOption>>,
    submitting: bool,
    field_errors: FieldErrors,
    toast: Option<String>,
}

impl ApplicationSession {
    pub fn new(
        profile: Arc<OfferProfile>,
        offer_id: impl Into<String>,
        identity: Identity,
        options: SessionOptions,
    ) -> Self {
        let form = FormState::new(&profile.catalog, &IdentityDefaults::from(&identity));
        Self {
            id: Uuid::new_v4(),
            generation: 0,
            profile,
            offer_id: offer_id.into().trim().to_string(),
            identity,
            options,
            offer: LoadState::Pending,
            existing: LoadState::Pending,
            fields: None,
            steps: Vec::new(),
            cursor: WizardCursor::default(),
            form,
            select_options: BTreeMap::new(),
            submitting: false,
            field_errors: FieldErrors::new(),
            toast: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> &OfferProfile {
        &self.profile
    }

    pub fn offer_id(&self) -> &str {
        &self.offer_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Ticket for the loads currently allowed to apply.
    pub fn ticket(&self) -> LoadTicket {
        LoadTicket {
            session: self.id,
            generation: self.generation,
        }
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        ticket == self.ticket()
    }

    /// Invalidates outstanding loads and returns the ticket for a fresh round.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.offer = LoadState::Pending;
        self.existing = LoadState::Pending;
        self.fields = None;
        self.steps.clear();
        self.cursor = WizardCursor::default();
        self.select_options.clear();
        self.submitting = false;
        self.field_errors.clear();
        self.toast = None;
        debug!(session = %self.id, generation = self.generation, "load started");
        self.ticket()
    }

    /// Points the session at another offer and starts over.
    pub fn retarget(&mut self, offer_id: impl Into<String>) -> LoadTicket {
        self.offer_id = offer_id.into().trim().to_string();
        self.form.reset(&IdentityDefaults::from(&self.identity));
        self.begin_load()
    }

    /// Adopts a new authenticated identity: defaults are re-derived, and ownership of
    /// existing applications must be looked up again.
    pub fn identity_changed(&mut self, identity: Identity) -> LoadTicket {
        self.identity = identity;
        self.form.reset(&IdentityDefaults::from(&self.identity));
        self.begin_load()
    }

    /// Applies the offer fetch result and plans the wizard. Returns false for stale tickets.
    pub fn apply_offer(
        &mut self,
        ticket: LoadTicket,
        result: Result<OfferRecord, CoreError>,
    ) -> bool {
        if !self.accepts(ticket) {
            warn!(session = %self.id, generation = ticket.generation, "discarding stale offer");
            return false;
        }
        match result {
            Ok(offer) => {
                let fields = FieldFilter::for_profile(&self.profile, Some(&offer));
                self.steps = fields
                    .as_deref()
                    .map(|fields| StepPlanner::plan(&self.profile.steps, fields))
                    .unwrap_or_default();
                self.cursor = WizardCursor::new(self.steps.len());
                self.fields = fields;
                self.offer = LoadState::Ready(offer);
            }
            Err(err) => {
                warn!(session = %self.id, offer_id = %self.offer_id, error = %err, "offer load failed");
                self.fields = None;
                self.steps.clear();
                self.cursor = WizardCursor::default();
                self.offer = LoadState::Failed(err.to_string());
            }
        }
        true
    }

    /// Applies the existing-application lookup. Returns false for stale tickets.
    pub fn apply_existing(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<ApplicationRecord>, CoreError>,
    ) -> bool {
        if !self.accepts(ticket) {
            warn!(session = %self.id, generation = ticket.generation, "discarding stale applications");
            return false;
        }
        self.existing = match result {
            Ok(found) => LoadState::Ready(found),
            Err(err) => {
                warn!(session = %self.id, offer_id = %self.offer_id, error = %err, "application lookup failed");
                LoadState::Failed(err.to_string())
            }
        };
        true
    }

    pub fn apply_options(
        &mut self,
        ticket: LoadTicket,
        source: &str,
        options: Vec<SelectOption>,
    ) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.select_options.insert(source.to_string(), options);
        true
    }

    /// Reference-data sources needed by the current plan, deduplicated.
    pub fn option_sources(&self) -> Vec<&'static str> {
        let mut sources: Vec<&'static str> = self
            .fields
            .iter()
            .flatten()
            .filter_map(|field| field.options)
            .collect();
        sources.sort_unstable();
        sources.dedup();
        sources
    }

    /// Runs a full load round against `backend`.
    pub fn load(&mut self, backend: &dyn PortalBackend) {
        let ticket = self.begin_load();

        let endpoint = self.profile.offer_endpoint(&self.offer_id);
        let offer = backend
            .fetch_offer(&endpoint)
            .map_err(CoreError::from)
            .and_then(|raw| {
                OfferRecord::from_value(raw)
                    .ok_or_else(|| CoreError::MalformedResponse("offer is not an object".into()))
            });
        self.apply_offer(ticket, offer);

        let existing = Reconciler::reconcile(
            backend,
            &self.profile,
            &self.offer_id,
            &self.identity,
            self.options.max_application_pages,
        );
        self.apply_existing(ticket, existing);

        for source in self.option_sources() {
            let options = OptionsService::load(backend, source, &self.options.labels);
            self.apply_options(ticket, source, options);
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        if self.offer.is_pending() || self.existing.is_pending() {
            return ViewMode::Loading;
        }
        if matches!(self.existing, LoadState::Ready(Some(_))) {
            return ViewMode::Status;
        }
        if self.fields.is_none() {
            return ViewMode::Unavailable;
        }
        if self.existing.error().is_some()
            && self.options.reconcile_failure == ReconcileFailurePolicy::Block
        {
            return ViewMode::Blocked;
        }
        ViewMode::Form
    }

    /// Inline load error, if any load failed.
    pub fn load_error(&self) -> Option<&str> {
        self.offer.error().or_else(|| self.existing.error())
    }

    pub fn offer(&self) -> Option<&OfferRecord> {
        self.offer.ready()
    }

    /// The application shown by the status view.
    pub fn application(&self) -> Option<&ApplicationRecord> {
        self.existing.ready().and_then(Option::as_ref)
    }

    /// Fields still needing input, once the offer has loaded.
    pub fn fields(&self) -> Option<&[FieldSpec]> {
        self.fields.as_deref()
    }

    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

    pub fn cursor(&self) -> WizardCursor {
        self.cursor
    }

    pub fn current_step(&self) -> Option<&ResolvedStep> {
        self.steps.get(self.cursor.index())
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn options(&self, source: &str) -> Option<&[SelectOption]> {
        self.select_options.get(source).map(Vec::as_slice)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_advance(&self) -> bool {
        !self.cursor.is_last() && self.current_step_valid()
    }

    pub fn can_submit(&self) -> bool {
        self.view_mode() == ViewMode::Form
            && !self.submitting
            && self.cursor.is_last()
            && StepValidator::first_invalid_step(&self.steps, &self.form).is_none()
    }

    /// Missing required fields on the current step.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.current_step()
            .map(|step| StepValidator::missing_fields(step, &self.form))
            .unwrap_or_default()
    }

    fn current_step_valid(&self) -> bool {
        self.current_step()
            .is_some_and(|step| StepValidator::is_step_valid(step, &self.form))
    }

    /// Records input for `name` and clears the backend error attached to it.
    pub fn set_field(&mut self, name: &str, event: InputEvent) -> Result<(), CoreError> {
        self.form.set_field(name, event)?;
        self.field_errors.remove(name);
        Ok(())
    }

    pub fn next(&mut self) -> WizardEvent {
        let valid = self.current_step_valid();
        self.cursor.next(valid)
    }

    pub fn back(&mut self) -> WizardEvent {
        self.cursor.back()
    }

    pub fn field_error(&self, name: &str) -> Option<&[String]> {
        self.field_errors.get(name).map(Vec::as_slice)
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn toast(&self) -> Option<&str> {
        self.toast.as_deref()
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// Validates and serializes the form, marking the session as submitting.
    pub fn prepare_submission(&mut self) -> Result<PendingSubmission, SubmitOutcome> {
        if self.submitting || self.view_mode() != ViewMode::Form {
            return Err(SubmitOutcome::Ignored);
        }
        // Only the last planned step submits; an empty plan never does.
        if self.steps.is_empty() || !self.cursor.is_last() {
            return Err(SubmitOutcome::Ignored);
        }
        if let Some(step) = StepValidator::first_invalid_step(&self.steps, &self.form) {
            self.cursor.rewind_to(step);
            let missing = StepValidator::missing_fields(&self.steps[step], &self.form);
            return Err(SubmitOutcome::Invalid { step, missing });
        }

        let fields = self.fields.as_deref().unwrap_or_default();
        let payload = match PayloadSerializer::serialize(
            &self.form,
            fields,
            self.profile.links.offer,
            &self.offer_id,
        ) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(session = %self.id, error = %err, "submission not serialized");
                self.toast = Some(GENERIC_SUBMIT_ERROR.to_string());
                return Err(SubmitOutcome::Failed(err.to_string()));
            }
        };

        self.submitting = true;
        self.toast = None;
        Ok(PendingSubmission {
            ticket: self.ticket(),
            endpoint: self.profile.application_endpoint(),
            payload,
        })
    }

    /// Applies the transport result of a prepared submission.
    pub fn finish_submission(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<Value>, TransportError>,
        clock: &dyn Clock,
    ) -> SubmitOutcome {
        if !self.accepts(ticket) {
            warn!(session = %self.id, "discarding stale submission result");
            return SubmitOutcome::Ignored;
        }
        self.submitting = false;

        match result {
            Ok(echo) => {
                let record = echo
                    .and_then(ApplicationRecord::from_value)
                    .filter(|record| record.id().is_some())
                    .unwrap_or_else(|| {
                        Reconciler::stand_in(
                            &self.profile.links,
                            &self.offer_id,
                            &self.identity,
                            clock.now(),
                        )
                    });
                info!(
                    session = %self.id,
                    domain = self.profile.kind.domain(),
                    offer_id = %self.offer_id,
                    local = record.is_local(),
                    "application submitted"
                );
                self.form.reset(&IdentityDefaults::from(&self.identity));
                self.cursor.reset();
                self.field_errors.clear();
                self.existing = LoadState::Ready(Some(record));
                SubmitOutcome::Submitted
            }
            Err(TransportError::Rejected(errors)) => {
                self.attach_rejection(&errors);
                SubmitOutcome::Rejected(errors)
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "submission failed");
                self.toast = Some(GENERIC_SUBMIT_ERROR.to_string());
                SubmitOutcome::Failed(err.to_string())
            }
        }
    }

    fn attach_rejection(&mut self, errors: &FieldErrors) {
        let mut general = Vec::new();
        self.field_errors.clear();
        for (name, messages) in errors {
            let on_form = self
                .fields
                .iter()
                .flatten()
                .any(|field| field.name == name.as_str());
            if on_form {
                self.field_errors.insert(name.clone(), messages.clone());
            } else {
                general.extend(messages.iter().cloned());
            }
        }

        if let Some(step) = self
            .steps
            .iter()
            .position(|step| self.field_errors.keys().any(|name| step.contains(name)))
        {
            self.cursor.rewind_to(step);
        }

        self.toast = if general.is_empty() {
            None
        } else {
            Some(general.join(" "))
        };
        info!(
            session = %self.id,
            fields = self.field_errors.len(),
            general = general.len(),
            "submission rejected"
        );
    }

    /// Validates, sends, and on success refreshes the existing application.
    pub fn submit(&mut self, backend: &dyn PortalBackend, clock: &dyn Clock) -> SubmitOutcome {
        let pending = match self.prepare_submission() {
            Ok(pending) => pending,
            Err(outcome) => return outcome,
        };
        let result = backend.submit(&pending.endpoint, &pending.payload);
        let outcome = self.finish_submission(pending.ticket, result, clock);
        if outcome == SubmitOutcome::Submitted {
            self.refresh(backend);
        }
        outcome
    }

    /// Replaces the displayed record with the canonical one when the lookup finds it.
    /// Failures and empty results keep what is shown.
    pub fn apply_refresh(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<ApplicationRecord>, CoreError>,
    ) -> bool {
        if !self.accepts(ticket) {
            warn!(session = %self.id, "discarding stale refresh");
            return false;
        }
        match result {
            Ok(Some(record)) => self.existing = LoadState::Ready(Some(record)),
            Ok(None) => debug!(session = %self.id, "refresh found nothing; keeping current record"),
            Err(err) => warn!(session = %self.id, error = %err, "refresh failed; keeping current record"),
        }
        true
    }

    pub fn refresh(&mut self, backend: &dyn PortalBackend) {
        let ticket = self.ticket();
        let result = Reconciler::reconcile(
            backend,
            &self.profile,
            &self.offer_id,
            &self.identity,
            self.options.max_application_pages,
        );
        self.apply_refresh(ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session() -> ApplicationSession {
        ApplicationSession::new(
            Arc::new(OfferProfile::study_visa()),
            "7",
            Identity::new("12").with_name("Amina", "Okafor"),
            SessionOptions::default(),
        )
    }

    fn offer() -> OfferRecord {
        OfferRecord::from_value(json!({ "id": "7", "institution": "X University" }))
            .expect("offer object")
    }

    #[test]
    fn stays_loading_until_both_loads_resolve() {
        let mut session = session();
        let ticket = session.begin_load();
        assert_eq!(session.view_mode(), ViewMode::Loading);

        session.apply_existing(ticket, Ok(None));
        assert_eq!(session.view_mode(), ViewMode::Loading);
        assert!(session.fields().is_none());

        session.apply_offer(ticket, Ok(offer()));
        assert_eq!(session.view_mode(), ViewMode::Form);
        assert!(!session.steps().is_empty());
    }

    #[test]
    fn stale_tickets_are_discarded() {
        let mut session = session();
        let first = session.begin_load();
        let second = session.retarget("8");

        assert!(!session.apply_offer(first, Ok(offer())));
        assert!(!session.apply_existing(first, Ok(None)));
        assert_eq!(session.view_mode(), ViewMode::Loading);

        assert!(session.apply_offer(second, Ok(offer())));
        assert!(session.apply_existing(second, Ok(None)));
        assert_eq!(session.view_mode(), ViewMode::Form);
    }

    #[test]
    fn tickets_from_other_sessions_are_rejected() {
        let mut mine = session();
        let mut theirs = session();
        mine.begin_load();
        let foreign = theirs.begin_load();
        assert_eq!(foreign.generation, mine.ticket().generation);
        assert!(!mine.apply_offer(foreign, Ok(offer())));
    }

    #[test]
    fn offer_failure_makes_the_form_unavailable() {
        let mut session = session();
        let ticket = session.begin_load();
        session.apply_offer(
            ticket,
            Err(TransportError::NotFound("/study-visa-offer/7/".into()).into()),
        );
        session.apply_existing(ticket, Ok(None));
        assert_eq!(session.view_mode(), ViewMode::Unavailable);
        assert!(session.load_error().is_some());
    }

    #[test]
    fn reconcile_failure_follows_policy() {
        let mut lenient = session();
        let ticket = lenient.begin_load();
        lenient.apply_offer(ticket, Ok(offer()));
        lenient.apply_existing(ticket, Err(TransportError::Network("offline".into()).into()));
        assert_eq!(lenient.view_mode(), ViewMode::Form);
        assert!(lenient.load_error().is_some());

        let mut strict = ApplicationSession::new(
            Arc::new(OfferProfile::study_visa()),
            "7",
            Identity::new("12"),
            SessionOptions {
                reconcile_failure: ReconcileFailurePolicy::Block,
                ..SessionOptions::default()
            },
        );
        let ticket = strict.begin_load();
        strict.apply_offer(ticket, Ok(offer()));
        strict.apply_existing(ticket, Err(TransportError::Network("offline".into()).into()));
        assert_eq!(strict.view_mode(), ViewMode::Blocked);
    }

    #[test]
    fn existing_application_shows_status() {
        let mut session = session();
        let ticket = session.begin_load();
        session.apply_offer(ticket, Ok(offer()));
        let record = ApplicationRecord::from_value(json!({ "id": 2, "status": "pending" }));
        session.apply_existing(ticket, Ok(record));
        assert_eq!(session.view_mode(), ViewMode::Status);
        assert_eq!(session.application().and_then(ApplicationRecord::id), Some(2));
    }

    #[test]
    fn next_is_gated_on_the_current_step() {
        let mut session = session();
        let ticket = session.begin_load();
        session.apply_offer(ticket, Ok(offer()));
        session.apply_existing(ticket, Ok(None));

        assert!(!session.missing_fields().is_empty());
        assert_eq!(session.next(), WizardEvent::Repeat);
        assert_eq!(session.cursor().index(), 0);
        assert_eq!(session.back(), WizardEvent::Repeat);
    }

    #[test]
    fn submit_outside_the_form_is_ignored() {
        let mut session = session();
        session.begin_load();
        assert_eq!(
            session.prepare_submission().err(),
            Some(SubmitOutcome::Ignored)
        );
    }

    #[test]
    fn identity_change_rederives_defaults_and_reloads() {
        let mut session = session();
        let ticket = session.begin_load();
        session.apply_offer(ticket, Ok(offer()));
        session.apply_existing(ticket, Ok(None));

        let next = session.identity_changed(Identity::new("13").with_username("kofi"));
        assert_ne!(next, ticket);
        assert_eq!(session.view_mode(), ViewMode::Loading);
        assert_eq!(session.form().identity_name(), "kofi");
    }
}
