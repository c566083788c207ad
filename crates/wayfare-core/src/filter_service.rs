//! Removes fields the applicant must not be asked for.

use tracing::debug;
use wayfare_domain::{FieldSpec, OfferRecord};

use crate::profile::{OfferLookup, OfferProfile};

/// System and bookkeeping keys that never become user input.
pub const SYSTEM_FIELDS: &[&str] = &[
    "id",
    "status",
    "notes",
    "submitted_at",
    "created_at",
    "updated_at",
    "client",
    "offer",
    "client_name",
    "offer_title",
    "offer_name",
];

pub struct FieldFilter;

impl FieldFilter {
    pub fn is_system_field(name: &str) -> bool {
        SYSTEM_FIELDS.contains(&name)
    }

    /// Returns the fields still needing input, preserving catalog order.
    ///
    /// `None` while the offer has not loaded: rendering a form before the offer is
    /// known would show fields that are about to disappear.
    pub fn apply(
        catalog: &[FieldSpec],
        offer: Option<&OfferRecord>,
        lookup: &OfferLookup,
    ) -> Option<Vec<FieldSpec>> {
        let offer = offer?;
        let fields: Vec<FieldSpec> = catalog
            .iter()
            .filter(|field| !Self::is_system_field(field.name))
            .filter(|field| !lookup.provides(offer, field.name))
            .cloned()
            .collect();
        debug!(
            catalog = catalog.len(),
            kept = fields.len(),
            "filtered catalog against offer"
        );
        Some(fields)
    }

    pub fn for_profile(profile: &OfferProfile, offer: Option<&OfferRecord>) -> Option<Vec<FieldSpec>> {
        Self::apply(&profile.catalog, offer, &profile.lookup)
    }
}
