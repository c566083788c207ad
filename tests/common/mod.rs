#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;
use serde_json::json;
use tempfile::TempDir;
use wayfare_backend_json::JsonPortalBackend;
use wayfare_config::{Config, ConfigManager};
use wayfare_core::IdentityProvider;
use wayfare_domain::Identity;
use wayfare_portal::Portal;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Identity provider whose user can be swapped mid-test.
#[derive(Clone, Default)]
pub struct SharedIdentity(pub Arc<Mutex<Option<Identity>>>);

impl SharedIdentity {
    pub fn signed_in(identity: Identity) -> Self {
        Self(Arc::new(Mutex::new(Some(identity))))
    }

    pub fn switch(&self, identity: Option<Identity>) {
        *self.0.lock().expect("identity lock") = identity;
    }
}

impl IdentityProvider for SharedIdentity {
    fn current_user(&self) -> Option<Identity> {
        self.0.lock().expect("identity lock").clone()
    }
}

pub fn amina() -> Identity {
    Identity::new("12").with_name("Amina", "Okafor")
}

/// Seeds a fixture tree with one study-visa offer and its reference options.
pub fn seeded_backend() -> (JsonPortalBackend, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let backend = JsonPortalBackend::new(base.join("fixtures")).expect("create json backend");
    backend
        .put_offer(
            "study-visa",
            "7",
            &json!({
                "id": "7",
                "title": "MSc Data Science",
                "university": { "name": "X University", "country": "Germany" }
            }),
        )
        .expect("seed offer");
    backend
        .put_options(
            "study-level",
            &json!({ "results": [{ "id": 1, "term": "Bachelor" }, { "id": 2, "term": "Master" }] }),
        )
        .expect("seed options");

    let config_manager =
        ConfigManager::with_base_dir(base.join("config")).expect("create config manager");
    (backend, config_manager)
}

pub fn setup_portal(
    identity: SharedIdentity,
) -> (Portal<JsonPortalBackend, SharedIdentity>, ConfigManager) {
    let (backend, config_manager) = seeded_backend();
    let backend = match identity.current_user() {
        Some(user) => backend.with_identity(user),
        None => backend,
    };
    let config = config_manager.load().unwrap_or_else(|_| Config::default());
    let portal = Portal::new(backend, identity, config).expect("create portal");
    (portal, config_manager)
}
