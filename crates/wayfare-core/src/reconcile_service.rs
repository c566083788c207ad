//! Matches the current user and offer to an existing application record.
//!
//! The backend has no "my application for offer X" lookup, so the engine pulls the
//! user's collection (paginated or bare), keeps owned records linked to the offer,
//! and picks the newest one.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info};
use wayfare_domain::{ApplicationRecord, Identity, LOCAL_MARKER};

use crate::{
    ports::{ApplicationQuery, PortalBackend},
    profile::{LinkKeys, OfferProfile},
    CoreError,
};

/// Status assigned to the optimistic record shown right after submitting.
pub const SUBMITTED_STATUS: &str = "submitted";

/// One page of the applications collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPage {
    pub records: Vec<ApplicationRecord>,
    pub next: Option<String>,
}

pub struct Reconciler;

impl Reconciler {
    /// Accepts `{ results: [...], next }` envelopes and bare arrays.
    pub fn parse_page(raw: Value) -> Result<ApplicationPage, CoreError> {
        let (items, next) = match raw {
            Value::Array(items) => (items, None),
            Value::Object(mut envelope) => {
                let items = match envelope.remove("results") {
                    Some(Value::Array(items)) => items,
                    Some(Value::Null) | None => Vec::new(),
                    Some(other) => {
                        return Err(CoreError::MalformedResponse(format!(
                            "`results` is not a list: {other}"
                        )))
                    }
                };
                let next = envelope
                    .get("next")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|link| !link.is_empty())
                    .map(str::to_string);
                (items, next)
            }
            other => {
                return Err(CoreError::MalformedResponse(format!(
                    "expected a list of applications, got {other}"
                )))
            }
        };

        let records = items
            .into_iter()
            .filter_map(ApplicationRecord::from_value)
            .collect();
        Ok(ApplicationPage { records, next })
    }

    /// Collects the user's applications, following `next` links up to `max_pages`.
    pub fn fetch_candidates(
        backend: &dyn PortalBackend,
        endpoint: &str,
        offer_id: &str,
        max_pages: u32,
    ) -> Result<Vec<ApplicationRecord>, CoreError> {
        let mut query = ApplicationQuery::for_offer(offer_id);
        let mut records = Vec::new();
        let mut pages = 0;
        loop {
            let page = Self::parse_page(backend.list_applications(endpoint, &query)?)?;
            pages += 1;
            records.extend(page.records);
            match page.next {
                Some(next) if pages < max_pages.max(1) => query = query.with_page(next),
                Some(_) => {
                    debug!(pages, "stopped following application pages at limit");
                    break;
                }
                None => break,
            }
        }
        Ok(records)
    }

    /// True when the record belongs to `identity`, by owner id or by the denormalized
    /// applicant name carried by legacy records.
    pub fn is_owned_by(record: &ApplicationRecord, identity: &Identity, links: &LinkKeys) -> bool {
        let id = identity.id.trim();
        if !id.is_empty() && record.linked_id(links.owner_id).as_deref() == Some(id) {
            return true;
        }
        let full_name = normalize_name(&identity.full_name());
        if full_name.is_empty() {
            return false;
        }
        record
            .text(links.owner_name)
            .map(normalize_name)
            .is_some_and(|name| name == full_name)
    }

    pub fn is_linked_to(record: &ApplicationRecord, offer_id: &str, links: &LinkKeys) -> bool {
        record.linked_id(links.offer).as_deref() == Some(offer_id.trim())
    }

    /// Newest-first ordering: by `submitted_at` when both records carry one,
    /// otherwise by numeric id.
    pub fn newest_first(a: &ApplicationRecord, b: &ApplicationRecord) -> Ordering {
        match (a.submitted_at(), b.submitted_at()) {
            (Some(left), Some(right)) => right.cmp(&left),
            _ => b.id().cmp(&a.id()),
        }
    }

    /// Picks the newest owned record linked to `offer_id`.
    ///
    /// Equivalent to sorting the owned records newest first and taking the first linked
    /// one, without requiring the mixed timestamp/id ordering to be total.
    pub fn select(
        records: &[ApplicationRecord],
        identity: &Identity,
        offer_id: &str,
        links: &LinkKeys,
    ) -> Option<ApplicationRecord> {
        records
            .iter()
            .filter(|record| Self::is_owned_by(record, identity, links))
            .filter(|record| Self::is_linked_to(record, offer_id, links))
            .fold(None::<&ApplicationRecord>, |best, candidate| match best {
                Some(current) if Self::newest_first(candidate, current) != Ordering::Less => {
                    Some(current)
                }
                _ => Some(candidate),
            })
            .cloned()
    }

    /// Runs the full lookup for `identity` and `offer_id`.
    pub fn reconcile(
        backend: &dyn PortalBackend,
        profile: &OfferProfile,
        offer_id: &str,
        identity: &Identity,
        max_pages: u32,
    ) -> Result<Option<ApplicationRecord>, CoreError> {
        let endpoint = profile.application_endpoint();
        let candidates = Self::fetch_candidates(backend, &endpoint, offer_id, max_pages)?;
        let found = Self::select(&candidates, identity, offer_id, &profile.links);
        info!(
            domain = profile.kind.domain(),
            offer_id,
            candidates = candidates.len(),
            found = found.as_ref().and_then(ApplicationRecord::id),
            "reconciled existing applications"
        );
        Ok(found)
    }

    /// Local stand-in displayed until the backend returns the canonical record.
    pub fn stand_in(
        links: &LinkKeys,
        offer_id: &str,
        identity: &Identity,
        submitted_at: DateTime<Utc>,
    ) -> ApplicationRecord {
        let mut fields = Map::new();
        fields.insert("status".into(), Value::from(SUBMITTED_STATUS));
        fields.insert("submitted_at".into(), Value::from(submitted_at.to_rfc3339()));
        fields.insert(links.offer.into(), Value::from(offer_id));
        fields.insert(links.owner_id.into(), Value::from(identity.id.clone()));
        fields.insert(links.owner_name.into(), Value::from(identity.full_name()));
        fields.insert(LOCAL_MARKER.into(), Value::Bool(true));
        ApplicationRecord::new(fields)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
