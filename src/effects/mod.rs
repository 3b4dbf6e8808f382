//! The imperative shell around the configuration graph.
//!
//! [`StateMachine`] owns the graph, reads and writes the current state through
//! a [`StateStorage`], and runs the exit/commit/notify/enter protocol when a
//! trigger fires. Failures of user actions surface as [`FireError`].

mod error;
mod machine;
mod storage;

pub use error::FireError;
pub use machine::{FireOutcome, StateMachine};
pub use storage::{ExternalState, OwnedState, StateStorage};
