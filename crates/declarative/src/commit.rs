//! Commit coordinator - pushes staged candidate changes as one version
//!
//! Create and delete calls only stage changes. Nothing becomes visible until
//! a push names the folders they were made in. The coordinator does not
//! order anything; the plan does that before any push.

use crate::error::{Error, Result};
use crate::types::Outcome;
use sasekit::{Folder, STATUS_OK, Session};

/// Push the candidate configuration of `folders` in a single request
///
/// Duplicate folders are dropped, keeping first-seen order. An empty folder
/// list is rejected without contacting the session.
pub fn push(session: &dyn Session, folders: &[Folder], description: &str) -> Result<Outcome> {
    let folders = dedup(folders);
    if folders.is_empty() {
        return Err(Error::NothingToPush);
    }

    let names: Vec<&str> = folders.iter().map(Folder::as_str).collect();
    log::info!("Pushing {} ({})", names.join(", "), description);

    let response = session.push(&folders, description)?;
    if !response.acknowledged(STATUS_OK) {
        return Err(Error::RemoteMutation {
            operation: "push",
            status: response.status,
            body: response.body,
        });
    }
    Ok(Outcome::changed(response.json()))
}

fn dedup(folders: &[Folder]) -> Vec<Folder> {
    let mut seen = Vec::with_capacity(folders.len());
    for folder in folders {
        if !seen.contains(folder) {
            seen.push(*folder);
        }
    }
    seen
}
