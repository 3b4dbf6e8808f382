//! Trigger arguments: the loosely typed `Args` boundary, runtime parameter
//! specs, and statically typed tuple parameters.

mod args;
mod spec;
mod typed;

pub use args::Args;
pub use spec::{ArgumentMismatch, ParamType, ParameterSpec};
pub use typed::{Parameters, TriggerWithParameters};
