//! Configuration errors.

use thiserror::Error;

/// Errors that can occur while configuring a state machine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Trigger '{trigger}' already has parameters configured")]
    ParametersAlreadyConfigured { trigger: String },
}
