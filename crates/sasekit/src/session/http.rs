//! Blocking HTTP session against the configuration API.
//!
//! Every call carries the bearer token obtained at connect time. Listings
//! follow the API's offset pagination until the reported total is reached.

use crate::auth::{self, AccessToken, Credentials, DEFAULT_SETTLE_DELAY, DEFAULT_TOKEN_URL, TokenClient};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::types::{ApiResponse, Folder, RemoteObject, ResourceKind, STATUS_OK};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.sase.paloaltonetworks.com";

/// Objects requested per listing page.
pub const PAGE_LIMIT: usize = 200;

const CONFIG_PREFIX: &str = "/sse/config/v1";

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Service account credentials.
    pub credentials: Credentials,
    /// Identity endpoint.
    pub token_url: String,
    /// API base URL.
    pub api_base: String,
    /// Wait between token issue and the first call.
    pub settle_delay: Duration,
    /// Overall per-request timeout, if any.
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    /// Config with default endpoints and settle delay.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            timeout: None,
        }
    }

    /// Override the identity endpoint.
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    /// Override the API base URL.
    #[must_use]
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Override the settle delay.
    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set a per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    data: Vec<Value>,
    #[serde(default)]
    total: Option<usize>,
}

/// Session backed by ureq.
///
/// # Example
///
/// ```no_run
/// use sasekit::{Credentials, Folder, HttpSession, ResourceKind, Session, SessionConfig};
///
/// let credentials = Credentials::new("svc@1.iam.panserviceaccount.com", "secret", "1");
/// let session = HttpSession::connect(&SessionConfig::new(credentials)).unwrap();
/// for object in session.list(ResourceKind::Tag, Folder::Shared).unwrap() {
///     println!("{} {}", object.name, object.id);
/// }
/// ```
pub struct HttpSession {
    agent: ureq::Agent,
    api_base: String,
    token: AccessToken,
    last: Mutex<Option<ApiResponse>>,
}

impl HttpSession {
    /// Fetch a token, wait out the settle delay, and return a ready session.
    pub fn connect(config: &SessionConfig) -> Result<Self> {
        let token = TokenClient::new(&config.token_url).fetch(&config.credentials)?;
        log::info!("authenticated against tsg {}", config.credentials.tsg_id);
        auth::settle(config.settle_delay);
        Ok(Self::with_token(&config.api_base, token, config.timeout))
    }

    /// Build a session around an already-issued token.
    #[must_use]
    pub fn with_token(api_base: &str, token: AccessToken, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
            last: Mutex::new(None),
        }
    }

    /// Get the API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}{}/{}", self.api_base, CONFIG_PREFIX, kind.collection())
    }

    fn object_url(&self, kind: ResourceKind, id: &str) -> String {
        format!("{}/{}", self.collection_url(kind), id)
    }

    fn push_url(&self) -> String {
        format!("{}{}/config-versions/candidate:push", self.api_base, CONFIG_PREFIX)
    }

    fn record(&self, status: u16, body: String) -> ApiResponse {
        let response = ApiResponse::new(status, body);
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(response.clone());
        response
    }

    fn read(&self, mut response: ureq::http::Response<ureq::Body>) -> Result<ApiResponse> {
        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        log::trace!("<- {status} ({} bytes)", body.len());
        Ok(self.record(status, body))
    }

    fn list_page(&self, kind: ResourceKind, folder: Folder, offset: usize) -> Result<ApiResponse> {
        let response = self
            .agent
            .get(&self.collection_url(kind))
            .query("folder", folder.as_str())
            .query("limit", PAGE_LIMIT.to_string())
            .query("offset", offset.to_string())
            .header("Authorization", &self.token.bearer())
            .header("Accept", "application/json")
            .call()?;
        self.read(response)
    }
}

fn decode_page(response: &ApiResponse) -> Result<ListPage> {
    if response.status != STATUS_OK {
        return Err(Error::Status {
            status: response.status,
            body: response.body.clone(),
        });
    }
    Ok(serde_json::from_str(&response.body)?)
}

/// Decode the entries of one page, skipping those without an id or a name
///
/// Such entries cannot be matched by name or deleted by id.
fn decode_objects(kind: ResourceKind, data: Vec<Value>) -> Vec<RemoteObject> {
    data.into_iter()
        .filter_map(|raw| match RemoteObject::from_value(raw) {
            Ok(object) => Some(object),
            Err(err) => {
                log::warn!("Skipping {} entry: {err}", kind.collection());
                None
            }
        })
        .collect()
}

/// Whether another page must be requested after reading `read` objects.
fn has_more(page: &ListPage, read: usize) -> bool {
    if page.data.is_empty() {
        return false;
    }
    match page.total {
        Some(total) => read < total,
        None => page.data.len() >= PAGE_LIMIT,
    }
}

impl Session for HttpSession {
    fn list(&self, kind: ResourceKind, folder: Folder) -> Result<Vec<RemoteObject>> {
        log::debug!("GET {} in {}", kind.collection(), folder);
        let mut objects = Vec::new();
        let mut read = 0;

        loop {
            let response = self.list_page(kind, folder, read)?;
            let page = decode_page(&response)?;
            read += page.data.len();
            let more = has_more(&page, read);
            objects.extend(decode_objects(kind, page.data));
            if !more {
                break;
            }
        }

        log::debug!("{} {} object(s) in {}", objects.len(), kind.collection(), folder);
        Ok(objects)
    }

    fn create(&self, kind: ResourceKind, folder: Folder, payload: &Value) -> Result<ApiResponse> {
        log::debug!("POST {} in {}", kind.collection(), folder);
        let response = self
            .agent
            .post(&self.collection_url(kind))
            .query("folder", folder.as_str())
            .header("Authorization", &self.token.bearer())
            .header("Accept", "application/json")
            .send_json(payload)?;
        self.read(response)
    }

    fn delete(&self, kind: ResourceKind, folder: Folder, id: &str) -> Result<ApiResponse> {
        log::debug!("DELETE {}/{} in {}", kind.collection(), id, folder);
        let response = self
            .agent
            .delete(&self.object_url(kind, id))
            .query("folder", folder.as_str())
            .header("Authorization", &self.token.bearer())
            .header("Accept", "application/json")
            .call()?;
        self.read(response)
    }

    fn push(&self, folders: &[Folder], description: &str) -> Result<ApiResponse> {
        let names: Vec<&str> = folders.iter().map(Folder::as_str).collect();
        log::debug!("POST candidate:push for {}", names.join(", "));
        let body = json!({
            "folders": names,
            "description": description,
        });
        let response = self
            .agent
            .post(&self.push_url())
            .header("Authorization", &self.token.bearer())
            .header("Accept", "application/json")
            .send_json(&body)?;
        self.read(response)
    }

    fn last_response(&self) -> Option<ApiResponse> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
