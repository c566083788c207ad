#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;
use wayfare_core::{ApplicationQuery, PortalBackend, TransportError};
use wayfare_domain::Payload;

/// Scripted backend: responses are keyed by endpoint, submissions and queries are recorded.
#[derive(Default)]
pub struct FakeBackend {
    offers: Mutex<HashMap<String, Result<Value, TransportError>>>,
    options: Mutex<HashMap<String, Result<Value, TransportError>>>,
    pages: Mutex<HashMap<Option<String>, Result<Value, TransportError>>>,
    submit_results: Mutex<Vec<Result<Option<Value>, TransportError>>>,
    pub submissions: Mutex<Vec<(String, Payload)>>,
    pub queries: Mutex<Vec<ApplicationQuery>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offer(self, endpoint: &str, offer: Value) -> Self {
        self.offers
            .lock()
            .expect("offers lock")
            .insert(endpoint.to_string(), Ok(offer));
        self
    }

    pub fn with_options(self, endpoint: &str, options: Value) -> Self {
        self.options
            .lock()
            .expect("options lock")
            .insert(endpoint.to_string(), Ok(options));
        self
    }

    /// Sets the first page of applications.
    pub fn with_applications(self, collection: Value) -> Self {
        self.set_page(None, Ok(collection));
        self
    }

    pub fn with_page(self, token: &str, collection: Value) -> Self {
        self.set_page(Some(token.to_string()), Ok(collection));
        self
    }

    pub fn failing_applications(self, error: TransportError) -> Self {
        self.set_page(None, Err(error));
        self
    }

    pub fn set_page(&self, token: Option<String>, result: Result<Value, TransportError>) {
        self.pages.lock().expect("pages lock").insert(token, result);
    }

    /// Queues the next submission result. Without a queued result, submissions succeed
    /// with no echoed record.
    pub fn queue_submit(&self, result: Result<Option<Value>, TransportError>) {
        self.submit_results
            .lock()
            .expect("submit lock")
            .push(result);
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().expect("submissions lock").len()
    }

    pub fn last_submission(&self) -> Option<Payload> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .last()
            .map(|(_, payload)| payload.clone())
    }
}

impl PortalBackend for FakeBackend {
    fn fetch_offer(&self, endpoint: &str) -> Result<Value, TransportError> {
        self.offers
            .lock()
            .expect("offers lock")
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::NotFound(endpoint.to_string())))
    }

    fn fetch_options(&self, endpoint: &str) -> Result<Value, TransportError> {
        self.options
            .lock()
            .expect("options lock")
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Err(TransportError::NotFound(endpoint.to_string())))
    }

    fn list_applications(
        &self,
        _endpoint: &str,
        query: &ApplicationQuery,
    ) -> Result<Value, TransportError> {
        self.queries.lock().expect("queries lock").push(query.clone());
        self.pages
            .lock()
            .expect("pages lock")
            .get(&query.page)
            .cloned()
            .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
    }

    fn submit(&self, endpoint: &str, payload: &Payload) -> Result<Option<Value>, TransportError> {
        self.submissions
            .lock()
            .expect("submissions lock")
            .push((endpoint.to_string(), payload.clone()));
        let mut queued = self.submit_results.lock().expect("submit lock");
        if queued.is_empty() {
            Ok(None)
        } else {
            queued.remove(0)
        }
    }
}
