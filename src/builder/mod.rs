//! Builder API for configuring states.
//!
//! `StateMachine::configure` hands out a [`StateConfiguration`] for one state.
//! The macros declare enums that satisfy the identity bounds with minimal
//! boilerplate.

mod configuration;
pub mod error;
pub mod macros;

pub use configuration::StateConfiguration;
pub use error::ConfigError;
