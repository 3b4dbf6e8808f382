//! Core state machine types and logic.
//!
//! This module holds the synchronous core of the engine:
//! - State and trigger identities via the `State` and `Trigger` traits
//! - Guard predicates for gating behaviours
//! - The node arena that answers hierarchy and resolution queries
//! - Transition records and history tracking
//!
//! Nothing in here runs user actions; executing a transition is the job of
//! [`crate::effects`].

mod behaviour;
mod graph;
mod guard;
mod history;
mod node;
mod state;
mod transition;

pub(crate) use behaviour::TriggerBehaviour;
pub(crate) use graph::StateGraph;
pub(crate) use guard::Guard;
pub(crate) use node::{EntryFn, ExitFn};

pub use history::{TransitionHistory, TransitionRecord};
pub use node::{ActionError, ActionResult};
pub use state::{State, Trigger};
pub use transition::Transition;
