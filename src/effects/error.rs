//! Errors raised while executing a transition.

use crate::core::ActionError;
use thiserror::Error;

/// A user action or observer failed part-way through `fire`.
///
/// Whatever remained of the exit/commit/notify/enter sequence did not run.
/// `Observer` and `EntryAction` happen after the commit, so the machine is
/// already in the destination state when they are returned.
#[derive(Debug, Error)]
pub enum FireError {
    #[error("Exit action of state '{state}' failed: {source}")]
    ExitAction {
        state: String,
        #[source]
        source: ActionError,
    },

    #[error("Transition observer failed for '{from}' -> '{to}': {source}")]
    Observer {
        from: String,
        to: String,
        #[source]
        source: ActionError,
    },

    #[error("Entry action of state '{state}' failed: {source}")]
    EntryAction {
        state: String,
        #[source]
        source: ActionError,
    },
}

impl FireError {
    /// True when the failure happened after the new state was committed.
    pub fn is_after_commit(&self) -> bool {
        !matches!(self, Self::ExitAction { .. })
    }
}
