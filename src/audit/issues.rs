//! Findings reported by the configuration audit.

use thiserror::Error;

/// A configuration problem the engine tolerates at runtime but that almost
/// certainly indicates a mistake.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Following superstate links from `state` leads back to `state`.
    #[error("Superstate chain of '{state}' loops back to itself")]
    CyclicHierarchy { state: String },

    /// A plain permit targets its own state; `permit_reentry` was likely meant.
    #[error("State '{state}' permits '{trigger}' back to itself without reentry")]
    IdentityTransition { state: String, trigger: String },

    /// Several unguarded behaviours answer one trigger, so resolution always
    /// fails as ambiguous.
    #[error("State '{state}' has {count} unguarded behaviours for '{trigger}'")]
    UnconditionalConflict {
        state: String,
        trigger: String,
        count: usize,
    },
}
