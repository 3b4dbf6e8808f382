//! Runtime argument contracts attached to triggers.

use super::args::Args;
use std::any::{type_name, Any, TypeId};
use thiserror::Error;
use tracing::warn;

/// One expected argument type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamType {
    id: TypeId,
    name: &'static str,
}

impl ParamType {
    pub fn of<A: Any>() -> Self {
        Self {
            id: TypeId::of::<A>(),
            name: type_name::<A>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A supplied argument that does not match the declared type at its position.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("argument {index}: expected {expected}, found {found}")]
pub struct ArgumentMismatch {
    pub index: usize,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Ordered list of argument types a trigger expects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    types: Vec<ParamType>,
}

impl ParameterSpec {
    pub fn new(types: Vec<ParamType>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &[ParamType] {
        &self.types
    }

    pub fn arity(&self) -> usize {
        self.types.len()
    }

    /// Check `args` positionally against the declared types.
    ///
    /// Only the first `min(args.len(), arity)` positions are inspected. Each
    /// mismatch is logged and returned; none of them is fatal.
    pub fn validate(&self, args: &Args) -> Vec<ArgumentMismatch> {
        let checked = args.len().min(self.types.len());
        let mismatches: Vec<ArgumentMismatch> = (0..checked)
            .filter_map(|index| {
                let expected = self.types[index];
                match args.type_id(index) {
                    Some(id) if id == expected.id => None,
                    _ => Some(ArgumentMismatch {
                        index,
                        expected: expected.name,
                        found: args.type_name(index).unwrap_or("<absent>"),
                    }),
                }
            })
            .collect();

        for mismatch in &mismatches {
            warn!(%mismatch, "trigger argument does not match its declared type");
        }
        mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_and_name() -> ParameterSpec {
        ParameterSpec::new(vec![ParamType::of::<i32>(), ParamType::of::<String>()])
    }

    #[test]
    fn matching_arguments_validate_cleanly() {
        let args = Args::new().with(1i32).with(String::from("a"));
        assert!(int_and_name().validate(&args).is_empty());
    }

    #[test]
    fn mismatch_is_reported_with_position() {
        let args = Args::new().with(1i32).with(2i32);
        let mismatches = int_and_name().validate(&args);

        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].index, 1);
        assert_eq!(mismatches[0].expected, ParamType::of::<String>().name());
        assert_eq!(mismatches[0].found, type_name::<i32>());
    }

    #[test]
    fn fewer_arguments_than_declared_are_not_mismatches() {
        let args = Args::new().with(1i32);
        assert!(int_and_name().validate(&args).is_empty());
        assert!(int_and_name().validate(&Args::new()).is_empty());
    }

    #[test]
    fn extra_arguments_are_not_inspected() {
        let args = Args::new()
            .with(1i32)
            .with(String::from("a"))
            .with(false);
        assert!(int_and_name().validate(&args).is_empty());
    }

    #[test]
    fn arity_counts_declared_types() {
        assert_eq!(int_and_name().arity(), 2);
        assert_eq!(ParameterSpec::new(Vec::new()).arity(), 0);
    }
}
