//! Loosely typed positional arguments.
//!
//! `Args` is the boundary where externally supplied values enter the engine.
//! Every lookup is by position and type; a missing or mistyped value is an
//! absent result, never an error.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use tracing::debug;

struct Arg {
    value: Box<dyn Any>,
    type_name: &'static str,
}

/// Ordered list of type-erased argument values passed to `fire`.
///
/// # Example
///
/// ```rust
/// use hsm_engine::parameters::Args;
///
/// let args = Args::new().with(5i32).with(String::from("left"));
///
/// assert_eq!(args.get::<i32>(0), Some(5));
/// assert_eq!(args.get::<String>(1).as_deref(), Some("left"));
/// assert_eq!(args.get::<u8>(0), None); // wrong type
/// assert_eq!(args.get::<i32>(7), None); // out of range
/// ```
#[derive(Default)]
pub struct Args {
    values: Vec<Arg>,
}

impl Args {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Append a value.
    pub fn push<A: Any>(&mut self, value: A) {
        self.values.push(Arg {
            value: Box::new(value),
            type_name: type_name::<A>(),
        });
    }

    /// Append a value, builder style.
    pub fn with<A: Any>(mut self, value: A) -> Self {
        self.push(value);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the concrete type stored at `index`.
    pub fn type_name(&self, index: usize) -> Option<&'static str> {
        self.values.get(index).map(|arg| arg.type_name)
    }

    pub(crate) fn type_id(&self, index: usize) -> Option<TypeId> {
        self.values.get(index).map(|arg| (*arg.value).type_id())
    }

    /// Borrow the value at `index` if it exists and is an `A`.
    pub fn get_ref<A: Any>(&self, index: usize) -> Option<&A> {
        let arg = self.values.get(index)?;
        let value = arg.value.downcast_ref::<A>();
        if value.is_none() {
            debug!(
                index,
                expected = type_name::<A>(),
                found = arg.type_name,
                "argument type mismatch, treating as absent"
            );
        }
        value
    }

    /// Clone out the value at `index` if it exists and is an `A`.
    pub fn get<A: Any + Clone>(&self, index: usize) -> Option<A> {
        self.get_ref::<A>(index).cloned()
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|arg| arg.type_name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_have_no_values() {
        let args = Args::new();
        assert!(args.is_empty());
        assert_eq!(args.get::<i32>(0), None);
    }

    #[test]
    fn values_keep_their_positions() {
        let mut args = Args::new();
        args.push(1u8);
        args.push("two");
        args.push(3.0f64);

        assert_eq!(args.len(), 3);
        assert_eq!(args.get::<u8>(0), Some(1));
        assert_eq!(args.get::<&str>(1), Some("two"));
        assert_eq!(args.get::<f64>(2), Some(3.0));
    }

    #[test]
    fn mismatched_type_is_absent() {
        let args = Args::new().with(5i64);
        assert_eq!(args.get::<i32>(0), None);
        assert!(args.get_ref::<i64>(0).is_some());
    }

    #[test]
    fn type_ids_describe_stored_values() {
        let args = Args::new().with(5i32);
        assert_eq!(args.type_id(0), Some(TypeId::of::<i32>()));
        assert_eq!(args.type_id(1), None);
        assert_eq!(args.type_name(0), Some("i32"));
    }

    #[test]
    fn debug_lists_type_names() {
        let args = Args::new().with(1u16).with(true);
        assert_eq!(format!("{args:?}"), r#"["u16", "bool"]"#);
    }
}
