//! wayfare-backend-json
//!
//! Serves the portal endpoints from a directory of JSON fixtures:
//!
//! ```text
//! offers/{domain}/{id}.json      offer records
//! options/{source}.json          reference-data options
//! applications/{domain}.json     submitted applications (array)
//! ```

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use serde_json::{json, Map, Value};
use wayfare_core::{
    ApplicationQuery, Clock, FieldErrors, LinkKeys, PortalBackend, Reconciler, SystemClock,
    TransportError, SUBMITTED_STATUS,
};
use wayfare_domain::{ApplicationRecord, Identity, PartValue, Payload};

const FILE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_PAGE_SIZE: usize = 20;

/// Endpoint shapes understood by the fixture backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Offer { domain: String, id: String },
    Options { source: String },
    Applications { domain: String },
}

impl Route {
    pub fn parse(endpoint: &str) -> Option<Self> {
        let path = endpoint.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();
        match segments.as_slice() {
            [resource, id] if *id != "options" => resource
                .strip_suffix("-offer")
                .map(|domain| Route::Offer {
                    domain: domain.to_string(),
                    id: id.to_string(),
                }),
            [source, "options"] => Some(Route::Options {
                source: source.to_string(),
            }),
            [resource] => resource
                .strip_suffix("-application")
                .map(|domain| Route::Applications {
                    domain: domain.to_string(),
                }),
            _ => None,
        }
    }
}

/// Filesystem-backed [`PortalBackend`] for local development and integration tests.
#[derive(Clone)]
pub struct JsonPortalBackend {
    root: PathBuf,
    page_size: usize,
    acting: Option<Identity>,
    links: LinkKeys,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl JsonPortalBackend {
    pub fn new(root: PathBuf) -> io::Result<Self> {
        for dir in ["offers", "options", "applications"] {
            fs::create_dir_all(root.join(dir))?;
        }
        Ok(Self {
            root,
            page_size: DEFAULT_PAGE_SIZE,
            acting: None,
            links: LinkKeys::default(),
            clock: Arc::new(SystemClock),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Identity the backend acts for: submissions are stamped with it and listings are
    /// limited to its applications.
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.acting = Some(identity);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn offer_path(&self, domain: &str, id: &str) -> PathBuf {
        self.root
            .join("offers")
            .join(canonical_name(domain))
            .join(format!("{}.{}", canonical_name(id), FILE_EXTENSION))
    }

    pub fn options_path(&self, source: &str) -> PathBuf {
        self.root
            .join("options")
            .join(format!("{}.{}", canonical_name(source), FILE_EXTENSION))
    }

    pub fn applications_path(&self, domain: &str) -> PathBuf {
        self.root
            .join("applications")
            .join(format!("{}.{}", canonical_name(domain), FILE_EXTENSION))
    }

    pub fn put_offer(&self, domain: &str, id: &str, offer: &Value) -> io::Result<()> {
        save_json(&self.offer_path(domain, id), offer)
    }

    pub fn put_options(&self, source: &str, options: &Value) -> io::Result<()> {
        save_json(&self.options_path(source), options)
    }

    pub fn put_applications(&self, domain: &str, records: &[Value]) -> io::Result<()> {
        save_json(
            &self.applications_path(domain),
            &Value::Array(records.to_vec()),
        )
    }

    /// Every stored application for `domain`, in file order.
    pub fn applications(&self, domain: &str) -> Result<Vec<Value>, TransportError> {
        let path = self.applications_path(domain);
        if !path.exists() {
            return Ok(Vec::new());
        }
        match read_json(&path, &path.display().to_string())? {
            Value::Array(records) => Ok(records),
            other => Err(TransportError::InvalidResponse(format!(
                "{} holds {} instead of a list",
                path.display(),
                kind_of(&other)
            ))),
        }
    }

    fn route(&self, endpoint: &str) -> Result<Route, TransportError> {
        Route::parse(endpoint).ok_or_else(|| TransportError::NotFound(endpoint.to_string()))
    }

    fn page_envelope(
        &self,
        endpoint: &str,
        matching: Vec<Value>,
        offer_id: &str,
        page: usize,
    ) -> Value {
        let count = matching.len();
        let start = (page - 1).saturating_mul(self.page_size);
        let results: Vec<Value> = matching
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        let base = endpoint.split('?').next().unwrap_or(endpoint);
        let link = |page: usize| format!("{base}?offer_id={offer_id}&page={page}");
        let next = (start + self.page_size < count).then(|| link(page + 1));
        let previous = (page > 1).then(|| link(page - 1));
        json!({
            "count": count,
            "next": next,
            "previous": previous,
            "results": results,
        })
    }

    fn owned_by_acting(&self, record: &ApplicationRecord) -> bool {
        match &self.acting {
            Some(identity) => Reconciler::is_owned_by(record, identity, &self.links),
            None => true,
        }
    }

    fn record_from_payload(&self, payload: &Payload, id: i64) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("id".into(), Value::from(id));
        for part in payload.parts() {
            let value = match &part.value {
                PartValue::Text(text) => Value::from(text.clone()),
                PartValue::File(file) => Value::from(file.name.clone()),
            };
            record.insert(part.name.clone(), value);
        }
        if let Some(identity) = &self.acting {
            record.insert(self.links.owner_id.into(), Value::from(identity.id.clone()));
            record.insert(self.links.owner_name.into(), Value::from(identity.full_name()));
        }
        record.insert("status".into(), Value::from(SUBMITTED_STATUS));
        record.insert(
            "submitted_at".into(),
            Value::from(self.clock.now().to_rfc3339()),
        );
        record
    }
}

impl PortalBackend for JsonPortalBackend {
    fn fetch_offer(&self, endpoint: &str) -> Result<Value, TransportError> {
        match self.route(endpoint)? {
            Route::Offer { domain, id } => read_json(&self.offer_path(&domain, &id), endpoint),
            _ => Err(TransportError::NotFound(endpoint.to_string())),
        }
    }

    fn fetch_options(&self, endpoint: &str) -> Result<Value, TransportError> {
        match self.route(endpoint)? {
            Route::Options { source } => read_json(&self.options_path(&source), endpoint),
            _ => Err(TransportError::NotFound(endpoint.to_string())),
        }
    }

    fn list_applications(
        &self,
        endpoint: &str,
        query: &ApplicationQuery,
    ) -> Result<Value, TransportError> {
        let domain = match self.route(endpoint)? {
            Route::Applications { domain } => domain,
            _ => return Err(TransportError::NotFound(endpoint.to_string())),
        };
        let page = query
            .page
            .as_deref()
            .and_then(|link| query_param(link, "page"))
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let offer_id = query.offer_id.trim();

        let matching: Vec<Value> = self
            .applications(&domain)?
            .into_iter()
            .filter(|raw| {
                ApplicationRecord::from_value(raw.clone()).is_some_and(|record| {
                    self.owned_by_acting(&record)
                        && (offer_id.is_empty()
                            || record.linked_id(self.links.offer).as_deref() == Some(offer_id))
                })
            })
            .collect();

        Ok(self.page_envelope(endpoint, matching, offer_id, page))
    }

    fn submit(&self, endpoint: &str, payload: &Payload) -> Result<Option<Value>, TransportError> {
        let domain = match self.route(endpoint)? {
            Route::Applications { domain } => domain,
            _ => return Err(TransportError::NotFound(endpoint.to_string())),
        };

        let offer_id = payload.text(self.links.offer).unwrap_or_default().trim();
        if offer_id.is_empty() || !self.offer_path(&domain, offer_id).exists() {
            let mut errors = FieldErrors::new();
            errors.insert(
                self.links.offer.to_string(),
                vec![format!("Invalid offer \"{offer_id}\".")],
            );
            return Err(TransportError::Rejected(errors));
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TransportError::Network("fixture store is poisoned".into()))?;
        let mut records = self.applications(&domain)?;
        let next_id = records
            .iter()
            .filter_map(|raw| ApplicationRecord::from_value(raw.clone())?.id())
            .max()
            .unwrap_or(0)
            + 1;
        let record = Value::Object(self.record_from_payload(payload, next_id));
        records.push(record.clone());
        save_json(&self.applications_path(&domain), &Value::Array(records))
            .map_err(|err| io_error(err, endpoint))?;
        Ok(Some(record))
    }
}

fn read_json(path: &Path, endpoint: &str) -> Result<Value, TransportError> {
    let data = fs::read_to_string(path).map_err(|err| io_error(err, endpoint))?;
    serde_json::from_str(&data)
        .map_err(|err| TransportError::InvalidResponse(format!("{}: {err}", path.display())))
}

fn save_json(path: &Path, value: &Value) -> io::Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &data)?;
    fs::rename(&tmp, path)
}

fn io_error(err: io::Error, endpoint: &str) -> TransportError {
    match err.kind() {
        io::ErrorKind::NotFound => TransportError::NotFound(endpoint.to_string()),
        _ => TransportError::Network(format!("{endpoint}: {err}")),
    }
}

fn query_param<'a>(link: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = link.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| *name == key)
        .map(|(_, value)| value)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "unnamed".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
