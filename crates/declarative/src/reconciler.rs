//! Reconciler - decides and performs the one action that converges a resource
//!
//! ```text
//! list folder ─► find by name ─► decide ─► create | delete | no-op ─► Outcome
//! ```
//!
//! An object that already exists is never compared field by field: found
//! means converged. Nothing here retries.

use crate::compose::compose;
use crate::error::{Error, Result};
use crate::inventory::Inventory;
use crate::schema::Validated;
use crate::types::{Ensure, Outcome, Plan};
use sasekit::{STATUS_CREATED, STATUS_OK, Session};

/// Message reported when an absent resource is already gone
pub const NOT_FOUND_MESSAGE: &str = "does not exist";

/// Decide the plan for `name` against a fresh inventory
pub fn decide(inventory: &Inventory, name: &str, ensure: Ensure) -> Plan {
    let found = inventory.find(name);
    match (ensure, found) {
        (Ensure::Present, None) => Plan::Create,
        (Ensure::Present, Some(existing)) => Plan::NoOp {
            existing: Some(existing.clone()),
        },
        (Ensure::Absent, Some(existing)) => Plan::Delete {
            id: existing.id.clone(),
        },
        (Ensure::Absent, None) => Plan::NoOp { existing: None },
    }
}

/// List the folder and decide, without mutating anything
pub fn plan(session: &dyn Session, validated: &Validated<'_>, ensure: Ensure) -> Result<Plan> {
    let inventory = Inventory::fetch(session, validated.kind(), validated.folder())?;
    let plan = decide(&inventory, validated.name(), ensure);
    log::info!(
        "{} '{}' in {}: {}",
        validated.kind(),
        validated.name(),
        validated.folder(),
        plan.action()
    );
    Ok(plan)
}

/// Carry out a decided plan exactly once
pub fn apply(session: &dyn Session, validated: &Validated<'_>, plan: Plan) -> Result<Outcome> {
    let kind = validated.kind();
    let folder = validated.folder();

    match plan {
        Plan::Create => {
            let payload = compose(validated).to_value()?;
            let response = session.create(kind, folder, &payload)?;
            if !response.acknowledged(STATUS_CREATED) {
                return Err(Error::RemoteMutation {
                    operation: "create",
                    status: response.status,
                    body: response.body,
                });
            }
            Ok(Outcome::changed(response.json()))
        }
        Plan::Delete { id } => {
            let response = session.delete(kind, folder, &id)?;
            if !response.acknowledged(STATUS_OK) {
                return Err(Error::RemoteMutation {
                    operation: "delete",
                    status: response.status,
                    body: response.body,
                });
            }
            Ok(Outcome::changed(response.json()))
        }
        Plan::NoOp {
            existing: Some(existing),
        } => Ok(Outcome::unchanged(existing.raw)),
        Plan::NoOp { existing: None } => Ok(Outcome::message(NOT_FOUND_MESSAGE)),
    }
}

/// Converge one resource: list, decide, mutate
pub fn reconcile(session: &dyn Session, validated: &Validated<'_>, ensure: Ensure) -> Result<Outcome> {
    let plan = plan(session, validated, ensure)?;
    apply(session, validated, plan)
}
