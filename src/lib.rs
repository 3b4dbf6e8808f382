//! hsm-engine: a hierarchical state machine engine
//!
//! States form a tree through `substate_of`. A trigger fired in a state is
//! answered by the nearest node, walking up from the current state, whose
//! guards admit exactly one behaviour. A transition exits every state the
//! destination is not inside, commits the new state, notifies observers, and
//! enters every state the source was not inside.
//!
//! # Core Concepts
//!
//! - **States and triggers**: any `Clone + Eq + Hash + Debug` type, usually an
//!   enum declared with [`state_enum!`] / [`trigger_enum!`]
//! - **Behaviours**: fixed, reentrant, ignored, or dynamic transitions, each
//!   gated by a guard closure
//! - **Parameters**: typed trigger arguments declared once with
//!   [`StateMachine::set_trigger_parameters`]
//! - **Audit**: an opt-in pass that collects configuration mistakes
//! - **Worker**: a single background thread for host-side jobs
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::{state_enum, trigger_enum, StateMachine, TransitionHistory};
//!
//! state_enum! {
//!     enum Door { Open, Closed, Locked }
//! }
//!
//! trigger_enum! {
//!     enum Action { Close, Open, Lock, Unlock }
//! }
//!
//! let mut door = StateMachine::new(Door::Open);
//! door.configure(Door::Open).permit(Action::Close, Door::Closed);
//! door.configure(Door::Closed)
//!     .permit(Action::Open, Door::Open)
//!     .permit(Action::Lock, Door::Locked);
//! door.configure(Door::Locked)
//!     .substate_of(Door::Closed)
//!     .permit(Action::Unlock, Door::Closed);
//!
//! let history = TransitionHistory::new();
//! door.on_transitioned(history.recorder());
//!
//! door.fire(Action::Close).unwrap();
//! door.fire(Action::Lock).unwrap();
//!
//! assert_eq!(door.state(), Door::Locked);
//! assert!(door.is_in_state(&Door::Closed));
//! assert_eq!(history.path(), vec![Door::Open, Door::Closed, Door::Locked]);
//! ```

pub mod audit;
pub mod builder;
pub mod core;
pub mod effects;
pub mod parameters;
pub mod worker;

// Re-export commonly used types
pub use builder::{ConfigError, StateConfiguration};
pub use core::{
    ActionError, ActionResult, State, Transition, TransitionHistory, TransitionRecord, Trigger,
};
pub use effects::{FireError, FireOutcome, StateMachine};
pub use parameters::{Args, Parameters, TriggerWithParameters};
