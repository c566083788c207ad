mod common;

use std::{fs, sync::Arc};

use chrono::{TimeZone, Utc};
use common::{amina, setup_portal, SharedIdentity};
use wayfare_config::{Config, ReconcileFailure};
use wayfare_core::{
    ApplicationSession, FixedClock, InputEvent, PortalBackend, ReconcileFailurePolicy,
    SubmitOutcome, ViewMode, WizardEvent,
};
use wayfare_domain::{FieldKind, FileHandle, Identity, OfferKind};
use wayfare_portal::{Portal, PortalError};

fn fill(session: &mut ApplicationSession) {
    let fields: Vec<_> = session
        .fields()
        .expect("offer loaded")
        .iter()
        .filter(|field| !field.identity)
        .cloned()
        .collect();
    for field in fields {
        let event = match field.kind {
            FieldKind::File => InputEvent::files(vec![FileHandle::new(
                format!("{}.pdf", field.name),
                "application/pdf",
                vec![7; 16],
            )]),
            FieldKind::Boolean => InputEvent::checked(true),
            FieldKind::Select => InputEvent::text("2"),
            _ => InputEvent::text("2024-09-01"),
        };
        session.set_field(field.name, event).expect("set field");
    }
    session
        .set_field("passport_number", InputEvent::text("A1234567"))
        .expect("set passport number");
    while session.next() == WizardEvent::Moved {}
}

#[test]
fn offer_aliases_hide_fields_already_known() {
    let (portal, _) = setup_portal(SharedIdentity::signed_in(amina()));
    let session = portal.open(OfferKind::StudyVisa, "7").expect("open session");

    assert_eq!(session.view_mode(), ViewMode::Form);
    let names: Vec<&str> = session
        .fields()
        .expect("offer loaded")
        .iter()
        .map(|field| field.name)
        .collect();
    assert!(!names.contains(&"institution"));
    assert!(!names.contains(&"destination_country"));
    assert!(names.contains(&"program"));
    assert!(names.contains(&"passport_number"));
    assert_eq!(
        session.options("study-level").map(|options| options[2].label.as_str()),
        Some("Master")
    );
    assert_eq!(session.form().identity_name(), "Amina Okafor");
}

#[test]
fn submission_is_persisted_and_reconciled() {
    let (portal, _) = setup_portal(SharedIdentity::signed_in(amina()));
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
    let portal = portal.with_clock(Arc::new(FixedClock(now)));

    let mut session = portal.open(OfferKind::StudyVisa, "7").expect("open session");
    fill(&mut session);
    assert!(session.can_submit());
    assert_eq!(portal.submit(&mut session), SubmitOutcome::Submitted);

    assert_eq!(session.view_mode(), ViewMode::Status);
    let shown = session.application().expect("application shown");
    assert_eq!(shown.id(), Some(1));
    assert!(!shown.is_local());
    assert_eq!(shown.text("passport_copy"), Some("passport_copy.pdf"));

    let stored = portal
        .backend()
        .applications("study-visa")
        .expect("stored applications");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["offer"], "7");
    assert_eq!(stored[0]["has_previous_refusal"], "true");
    assert!(stored[0].get("applicant").is_some());
    assert!(stored[0].get("institution").is_none());

    let reopened = portal.open(OfferKind::StudyVisa, "7").expect("reopen session");
    assert_eq!(reopened.view_mode(), ViewMode::Status);
    assert_eq!(reopened.application().and_then(|record| record.id()), Some(1));
}

#[test]
fn anonymous_users_cannot_open_sessions() {
    let (portal, _) = setup_portal(SharedIdentity::default());
    assert!(matches!(
        portal.open(OfferKind::StudyVisa, "7"),
        Err(PortalError::NotAuthenticated)
    ));
}

#[test]
fn unknown_domains_and_offers_are_reported() {
    let (portal, _) = setup_portal(SharedIdentity::signed_in(amina()));

    assert!(matches!(
        portal.open_domain("space-tourism", "1"),
        Err(PortalError::UnknownOfferKind(_))
    ));

    let missing = portal.open_domain("study-visa", "99").expect("open session");
    assert_eq!(missing.view_mode(), ViewMode::Unavailable);
    assert!(missing.load_error().is_some());
}

#[test]
fn reconcile_failure_policy_comes_from_config() {
    let (portal, config_manager) = setup_portal(SharedIdentity::signed_in(amina()));
    fs::write(
        portal.backend().applications_path("study-visa"),
        "{ \"broken\": true }",
    )
    .expect("corrupt applications");

    let lenient = portal.open(OfferKind::StudyVisa, "7").expect("open session");
    assert_eq!(lenient.view_mode(), ViewMode::Form);
    assert!(lenient.load_error().is_some());

    let config = Config {
        reconcile_failure: ReconcileFailure::Block,
        ..Config::default()
    };
    config_manager.save(&config).expect("save config");
    let loaded = config_manager.load().expect("load config");

    let strict = Portal::new(portal.backend().clone(), SharedIdentity::signed_in(amina()), loaded)
        .expect("create portal");
    assert_eq!(
        strict.session_options().reconcile_failure,
        ReconcileFailurePolicy::Block
    );
    let blocked = strict.open(OfferKind::StudyVisa, "7").expect("open session");
    assert_eq!(blocked.view_mode(), ViewMode::Blocked);
}

#[test]
fn identity_changes_reset_the_session() {
    let identity = SharedIdentity::signed_in(amina());
    let (portal, _) = setup_portal(identity.clone());
    let mut session = portal.open(OfferKind::StudyVisa, "7").expect("open session");
    session
        .set_field("nationality", InputEvent::text("Nigerian"))
        .expect("set field");

    assert!(!portal.sync_identity(&mut session).expect("same user"));

    identity.switch(Some(Identity::new("40").with_name("Kofi", "Mensah")));
    assert!(portal.sync_identity(&mut session).expect("new user"));
    assert_eq!(session.form().identity_name(), "Kofi Mensah");
    assert_eq!(
        session.form().value("nationality").and_then(|value| value.as_text()),
        Some("")
    );
    assert_eq!(session.view_mode(), ViewMode::Form);

    identity.switch(None);
    assert!(matches!(
        portal.sync_identity(&mut session),
        Err(PortalError::NotAuthenticated)
    ));
}

#[test]
fn labels_follow_configuration() {
    let (portal, _) = setup_portal(SharedIdentity::signed_in(amina()));
    let config = Config {
        select_placeholder_label: "Choose one".into(),
        other_option_label: "Something else".into(),
        ..Config::default()
    };
    let custom = Portal::new(portal.backend().clone(), SharedIdentity::signed_in(amina()), config)
        .expect("create portal");

    let session = custom.open(OfferKind::StudyVisa, "7").expect("open session");
    let english = session.options("english-test").expect("fallback options");
    assert_eq!(english[0].label, "Choose one");
    assert_eq!(english[1].label, "Something else");

    assert!(custom
        .backend()
        .fetch_options("/english-test/options/")
        .is_err());
}
