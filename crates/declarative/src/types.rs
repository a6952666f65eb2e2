//! Core types for reconciliation

use sasekit::{Folder, RemoteObject, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Desired presence of a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ensure {
    /// Resource should exist
    #[default]
    Present,
    /// Resource should not exist
    Absent,
}

impl Ensure {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl fmt::Display for Ensure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Absent => write!(f, "absent"),
        }
    }
}

impl std::str::FromStr for Ensure {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("unknown state '{other}' (expected present or absent)")),
        }
    }
}

/// The minimal action that converges one resource
///
/// Derived fresh from a listing on every call and never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum Plan {
    /// Nothing with this name exists; create it
    Create,
    /// An object with this name exists; delete it by its remote identity
    Delete { id: String },
    /// Already converged. `existing` is the matched object when present
    NoOp { existing: Option<RemoteObject> },
}

impl Plan {
    pub fn action(&self) -> Action {
        match self {
            Self::Create => Action::Create,
            Self::Delete { .. } => Action::Delete,
            Self::NoOp { .. } => Action::NoOp,
        }
    }

    /// Check if the plan mutates remote state
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp { .. })
    }
}

/// Plan without its data, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Delete,
    NoOp,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Delete => write!(f, "delete"),
            Self::NoOp => write!(f, "no-op"),
        }
    }
}

/// Payload of a reconciliation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutcomeData {
    /// Response body or matched object
    Json(Value),
    /// Human-readable status
    Message(String),
}

/// Result of one reconciliation or push: `{changed, data}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    pub data: OutcomeData,
}

impl Outcome {
    pub fn changed(data: Value) -> Self {
        Self {
            changed: true,
            data: OutcomeData::Json(data),
        }
    }

    pub fn unchanged(data: Value) -> Self {
        Self {
            changed: false,
            data: OutcomeData::Json(data),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            data: OutcomeData::Message(message.into()),
        }
    }
}

/// Per-entry line of an execution report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    pub kind: ResourceKind,
    pub folder: Folder,
    pub name: String,
    pub action: Action,
    /// Absent in dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub removed: usize,
    pub unchanged: usize,
    /// Changes not made because the run was declined
    pub skipped: usize,
    pub entries: Vec<EntryReport>,
}

impl ExecuteSummary {
    /// Total number of actual or planned changes
    pub fn total_changes(&self) -> usize {
        self.created + self.removed
    }

    /// Total number of entries processed
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Add an entry to the summary
    pub fn add(&mut self, report: EntryReport) {
        match report.action {
            Action::Create => self.created += 1,
            Action::Delete => self.removed += 1,
            Action::NoOp => self.unchanged += 1,
        }
        self.entries.push(report);
    }

    /// Outcomes of every entry that was applied
    pub fn outcomes(&self) -> Vec<&Outcome> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref()).collect()
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// List and decide, but don't mutate
    pub dry_run: bool,
}
