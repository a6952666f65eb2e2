//! # Declarative
//!
//! Idempotent reconciliation of SASE configuration objects.
//!
//! Each resource is declared once with a desired presence. The crate lists
//! what exists in the resource's folder, correlates by name only, and
//! performs at most one create or delete to converge. Staged changes become
//! visible after a push through the commit coordinator.
//!
//! ## Core Concepts
//!
//! - **Descriptor**: The desired fields of one resource, typed per kind
//! - **Validated**: A descriptor that passed the schema checks for its kind and folder
//! - **Payload**: The wire body composed from a validated descriptor, defaults filled in
//! - **Plan**: Create, delete or no-op, decided from a fresh inventory
//! - **ExecutionPlan**: Manifest entries reconciled in dependency order
//!
//! ## Example
//!
//! ```no_run
//! use declarative::{Descriptor, Ensure, reconcile, validate};
//! use sasekit::{Folder, MockSession, ResourceKind};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = MockSession::new();
//! let descriptor = Descriptor::from_fields(
//!     ResourceKind::Address,
//!     json!({
//!         "name": "Ansible Test",
//!         "description": "test address",
//!         "ip_netmask": "100.10.254.0/24"
//!     }),
//! )?;
//!
//! let validated = validate(Folder::ServiceConnections, &descriptor)?;
//! let outcome = reconcile(&session, &validated, Ensure::Present)?;
//! assert!(outcome.changed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Provider Traits
//!
//! - [`sasekit::Session`]: Performs the remote calls
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on a
//! specific UI or transport.

pub mod commit;
pub mod compose;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod inventory;
pub mod planner;
pub mod reconciler;
pub mod schema;
pub mod types;

// Re-export main types at crate root
pub use commit::push;
pub use compose::{Payload, compose};
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use descriptor::{Descriptor, Reference};
pub use error::{Error, Result, ValidationError};
pub use executor::{check, execute, execute_simple};
pub use inventory::{Inventory, find_by_name};
pub use planner::{ExecutionPlan, ManifestEntry, Target};
pub use reconciler::{NOT_FOUND_MESSAGE, apply, decide, plan, reconcile};
pub use schema::{KindSchema, Rule, Validated, VariantGroup, schema_for, validate};
pub use types::{
    Action, EntryReport, Ensure, ExecuteOptions, ExecuteSummary, Outcome, OutcomeData, Plan,
};
