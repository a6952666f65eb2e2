//! Error taxonomy for reconciliation

use sasekit::{Folder, ResourceKind};
use std::fmt;

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;

/// A descriptor failed a required-field or variant-group check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Kind the descriptor was validated as
    pub kind: ResourceKind,
    /// Offending group or field
    pub group: String,
    /// What is wrong
    pub reason: String,
}

impl ValidationError {
    pub fn new(kind: ResourceKind, group: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            kind,
            group: group.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.group)
    }
}

impl std::error::Error for ValidationError {}

/// Everything that can stop a reconciliation or a push
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Descriptor is inconsistent; no remote call was made
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Session could not be established or was rejected
    #[error("could not authenticate")]
    Authentication(#[source] sasekit::Error),

    /// Create, delete or push was not acknowledged
    #[error("Did not receive proper response for {operation} (status {status}): {body}")]
    RemoteMutation {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Transport or collaborator failure
    #[error("remote call failed")]
    Transport(#[source] sasekit::Error),

    /// A present resource names a resource the same plan removes
    #[error(
        "{kind} '{name}' in {folder} references {target_kind} '{target}', which is declared absent"
    )]
    Dependency {
        kind: ResourceKind,
        name: String,
        folder: Folder,
        target_kind: ResourceKind,
        target: String,
    },

    /// A push was requested without any folder
    #[error("no folders to push")]
    NothingToPush,

    /// The confirmation prompt itself failed
    #[error("confirmation failed: {0}")]
    Confirm(anyhow::Error),

    /// A payload could not be encoded
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<sasekit::Error> for Error {
    fn from(err: sasekit::Error) -> Self {
        if err.is_authentication() {
            Self::Authentication(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl Error {
    /// Whether the error happened before any remote call
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Dependency { .. } | Self::NothingToPush | Self::Encode(_)
        )
    }
}
