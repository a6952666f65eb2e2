//! Session trait and implementations for talking to the configuration API.
//!
//! This module provides the [`Session`] trait, the blocking [`http::HttpSession`]
//! used against the real platform, and [`MockSession`] for tests.
//!
//! # Testing
//!
//! Use [`MockSession`] for testing without network access:
//!
//! ```
//! use sasekit::{Folder, MockSession, ResourceKind, Session, Verb};
//! use serde_json::json;
//!
//! let mock = MockSession::new();
//! mock.seed(ResourceKind::Tag, Folder::Shared, json!({"name": "prod"}));
//!
//! let tags = mock.list(ResourceKind::Tag, Folder::Shared).unwrap();
//! assert_eq!(tags.len(), 1);
//! assert_eq!(mock.calls(Verb::List), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{ApiResponse, Folder, RemoteObject, ResourceKind, STATUS_CREATED, STATUS_OK};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An authenticated handle to the configuration API.
///
/// Mutations return the raw response whatever its status; deciding whether
/// the status is an acknowledgment is up to the caller. Only transport
/// problems (and, for `list`, a non-success status) are errors here.
pub trait Session: Send + Sync {
    /// List every object of `kind` in `folder`, in listing order.
    fn list(&self, kind: ResourceKind, folder: Folder) -> Result<Vec<RemoteObject>>;

    /// Stage the creation of an object.
    fn create(&self, kind: ResourceKind, folder: Folder, payload: &Value) -> Result<ApiResponse>;

    /// Stage the deletion of the object with the given remote identity.
    fn delete(&self, kind: ResourceKind, folder: Folder, id: &str) -> Result<ApiResponse>;

    /// Push the candidate configuration of `folders` as one version.
    fn push(&self, folders: &[Folder], description: &str) -> Result<ApiResponse>;

    /// Status and raw body of the most recent call, if any was made.
    fn last_response(&self) -> Option<ApiResponse>;
}

/// Session operations, used to count calls and force responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Inventory listing.
    List,
    /// Object creation.
    Create,
    /// Object deletion.
    Delete,
    /// Candidate push.
    Push,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Push => "push",
        };
        write!(f, "{name}")
    }
}

/// A push the mock accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushRecord {
    /// Folders named in the push.
    pub folders: Vec<Folder>,
    /// Version description.
    pub description: String,
}

#[derive(Debug, Default)]
struct MockState {
    objects: HashMap<(ResourceKind, Folder), Vec<RemoteObject>>,
    forced: HashMap<Verb, ApiResponse>,
    list_failure: Option<String>,
    calls: HashMap<Verb, usize>,
    pushes: Vec<PushRecord>,
    last: Option<ApiResponse>,
    next_id: u64,
    next_job: u64,
}

impl MockState {
    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        format!("{:08x}-0000-4000-8000-{:012x}", self.next_id, self.next_id)
    }

    fn count(&mut self, verb: Verb) {
        *self.calls.entry(verb).or_default() += 1;
    }

    fn respond(&mut self, response: ApiResponse) -> ApiResponse {
        self.last = Some(response.clone());
        response
    }

    fn insert(&mut self, kind: ResourceKind, folder: Folder, mut raw: Value) -> Option<RemoteObject> {
        let id = self.assign_id();
        let obj = raw.as_object_mut()?;
        obj.insert("id".to_string(), Value::String(id));
        obj.insert("folder".to_string(), Value::String(folder.as_str().to_string()));
        let object = RemoteObject::from_value(raw).ok()?;
        self.objects
            .entry((kind, folder))
            .or_default()
            .push(object.clone());
        Some(object)
    }
}

/// In-memory session for testing without network access.
///
/// Objects are stored per (kind, folder) with mock-assigned identities.
/// Every call is counted per [`Verb`], and any mutation can be forced to
/// answer with a fixed status and body.
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    /// Create a new empty mock session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store an object as if it had been created earlier.
    ///
    /// `raw` must be a JSON object with a `name`. Returns the assigned id,
    /// or `None` if `raw` was unusable.
    pub fn seed(&self, kind: ResourceKind, folder: Folder, raw: Value) -> Option<String> {
        self.state().insert(kind, folder, raw).map(|object| object.id)
    }

    /// Answer every following call of `verb` with this status and body.
    ///
    /// Forced mutations leave the store untouched. Forcing [`Verb::List`]
    /// has no effect; use [`MockSession::fail_list`] instead.
    pub fn force_response(&self, verb: Verb, status: u16, body: impl Into<String>) {
        self.state().forced.insert(verb, ApiResponse::new(status, body));
    }

    /// Stop forcing responses for `verb`.
    pub fn clear_forced(&self, verb: Verb) {
        self.state().forced.remove(&verb);
    }

    /// Make every following listing fail with a transport error.
    pub fn fail_list(&self, message: impl Into<String>) {
        self.state().list_failure = Some(message.into());
    }

    /// Number of calls made for `verb`.
    #[must_use]
    pub fn calls(&self, verb: Verb) -> usize {
        self.state().calls.get(&verb).copied().unwrap_or(0)
    }

    /// Number of calls made across all verbs.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.state().calls.values().sum()
    }

    /// Snapshot of the stored objects of `kind` in `folder`.
    #[must_use]
    pub fn objects(&self, kind: ResourceKind, folder: Folder) -> Vec<RemoteObject> {
        self.state()
            .objects
            .get(&(kind, folder))
            .cloned()
            .unwrap_or_default()
    }

    /// Pushes accepted so far.
    #[must_use]
    pub fn pushes(&self) -> Vec<PushRecord> {
        self.state().pushes.clone()
    }
}

fn error_body(code: &str, message: &str) -> String {
    json!({
        "_errors": [{"code": code, "message": message}],
        "_request_id": "mock"
    })
    .to_string()
}

impl Session for MockSession {
    fn list(&self, kind: ResourceKind, folder: Folder) -> Result<Vec<RemoteObject>> {
        let mut state = self.state();
        state.count(Verb::List);

        if let Some(message) = state.list_failure.clone() {
            return Err(Error::http(message, None));
        }

        let objects = state.objects.get(&(kind, folder)).cloned().unwrap_or_default();
        let data: Vec<&Value> = objects.iter().map(|o| &o.raw).collect();
        let body = json!({
            "data": data,
            "offset": 0,
            "total": objects.len(),
            "limit": 200
        });
        state.respond(ApiResponse::new(STATUS_OK, body.to_string()));
        Ok(objects)
    }

    fn create(&self, kind: ResourceKind, folder: Folder, payload: &Value) -> Result<ApiResponse> {
        let mut state = self.state();
        state.count(Verb::Create);

        if let Some(forced) = state.forced.get(&Verb::Create).cloned() {
            return Ok(state.respond(forced));
        }

        let response = match state.insert(kind, folder, payload.clone()) {
            Some(object) => ApiResponse::new(STATUS_CREATED, object.raw.to_string()),
            None => ApiResponse::new(400, error_body("E003", "Invalid Object")),
        };
        Ok(state.respond(response))
    }

    fn delete(&self, kind: ResourceKind, folder: Folder, id: &str) -> Result<ApiResponse> {
        let mut state = self.state();
        state.count(Verb::Delete);

        if let Some(forced) = state.forced.get(&Verb::Delete).cloned() {
            return Ok(state.respond(forced));
        }

        let removed = state.objects.get_mut(&(kind, folder)).and_then(|objects| {
            let index = objects.iter().position(|o| o.id == id)?;
            Some(objects.remove(index))
        });

        let response = match removed {
            Some(object) => ApiResponse::new(STATUS_OK, object.raw.to_string()),
            None => ApiResponse::new(404, error_body("E005", "Object Not Present")),
        };
        Ok(state.respond(response))
    }

    fn push(&self, folders: &[Folder], description: &str) -> Result<ApiResponse> {
        let mut state = self.state();
        state.count(Verb::Push);

        if let Some(forced) = state.forced.get(&Verb::Push).cloned() {
            return Ok(state.respond(forced));
        }

        state.next_job += 1;
        let job = state.next_job;
        state.pushes.push(PushRecord {
            folders: folders.to_vec(),
            description: description.to_string(),
        });
        let body = json!({
            "success": true,
            "job_id": job.to_string(),
            "message": format!("CommitAndPush job enqueued with jobid {job}")
        });
        Ok(state.respond(ApiResponse::new(STATUS_OK, body.to_string())))
    }

    fn last_response(&self) -> Option<ApiResponse> {
        self.state().last.clone()
    }
}
