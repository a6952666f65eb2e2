//! Provider traits for progress and confirmation
//!
//! These traits allow the declarative crate to be used without
//! depending on a specific terminal UI.

use crate::types::Action;
use anyhow::Result;

/// Progress callback for execution operations
///
/// Implement this trait to receive progress updates during execution.
pub trait ProgressCallback: Send {
    /// Called once with the number of entries about to run
    fn on_start(&mut self, total: usize);

    /// Called when starting to reconcile a single entry
    fn on_entry_start(&mut self, label: &str);

    /// Called when an entry completes
    fn on_entry_complete(&mut self, label: &str, action: Action);

    /// Called after the last entry
    fn on_finish(&mut self);
}

/// Confirmation callback for user interaction
///
/// Implement this trait to handle user confirmations.
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    ///
    /// # Returns
    /// `true` if the user confirmed, `false` otherwise
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _total: usize) {}
    fn on_entry_start(&mut self, _label: &str) {}
    fn on_entry_complete(&mut self, _label: &str, _action: Action) {}
    fn on_finish(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> Result<bool> {
        Ok(false)
    }
}
