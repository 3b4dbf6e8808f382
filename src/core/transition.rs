//! The record of a single source-to-destination move.

use super::state::{State, Trigger};

/// An immutable record of one transition, built per `fire` call.
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::Transition;
///
/// let transition = Transition::new("idle", "running", "start");
/// assert_eq!(transition.source(), &"idle");
/// assert_eq!(transition.destination(), &"running");
/// assert!(!transition.is_reentry());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<S: State, T: Trigger> {
    source: S,
    destination: S,
    trigger: T,
}

impl<S: State, T: Trigger> Transition<S, T> {
    pub fn new(source: S, destination: S, trigger: T) -> Self {
        Self {
            source,
            destination,
            trigger,
        }
    }

    /// The state the machine was in when the trigger fired.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The state the machine moves to.
    pub fn destination(&self) -> &S {
        &self.destination
    }

    /// The trigger that caused this transition.
    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    /// A transition is a reentry when it leaves and re-enters the same state.
    pub fn is_reentry(&self) -> bool {
        self.source == self.destination
    }
}
