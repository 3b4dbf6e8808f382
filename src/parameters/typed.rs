//! Statically typed trigger parameters.
//!
//! A trigger's argument list is described by a tuple type `P`. Firing through a
//! [`TriggerWithParameters<T, P>`] handle only accepts a `P`, and consumers
//! receive `P::Unpacked`: one `Option` per position, `None` wherever the
//! supplied value is missing or of another type.

use super::args::Args;
use super::spec::{ParamType, ParameterSpec};
use crate::core::Trigger;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// A tuple of argument types usable as trigger parameters.
///
/// Implemented for tuples of arity 0 through 4 whose members are
/// `Any + Clone`.
pub trait Parameters: 'static {
    /// What a consumer receives: the tuple with every member wrapped in `Option`.
    type Unpacked;

    fn param_types() -> Vec<ParamType>;

    fn into_args(self) -> Args;

    fn unpack(args: &Args) -> Self::Unpacked;

    fn spec() -> ParameterSpec {
        ParameterSpec::new(Self::param_types())
    }
}

macro_rules! impl_parameters {
    ($($idx:tt : $name:ident),*) => {
        impl<$($name: Any + Clone),*> Parameters for ($($name,)*) {
            type Unpacked = ($(Option<$name>,)*);

            fn param_types() -> Vec<ParamType> {
                vec![$(ParamType::of::<$name>()),*]
            }

            #[allow(unused_mut)]
            fn into_args(self) -> Args {
                let mut args = Args::new();
                $(args.push(self.$idx);)*
                args
            }

            #[allow(unused_variables, clippy::unused_unit)]
            fn unpack(args: &Args) -> Self::Unpacked {
                ($(args.get::<$name>($idx),)*)
            }
        }
    };
}

impl_parameters!();
impl_parameters!(0: A);
impl_parameters!(0: A, 1: B);
impl_parameters!(0: A, 1: B, 2: C);
impl_parameters!(0: A, 1: B, 2: C, 3: D);

/// Handle for a trigger with a declared argument list.
///
/// Obtained from `StateMachine::set_trigger_parameters`.
pub struct TriggerWithParameters<T: Trigger, P: Parameters> {
    trigger: T,
    _params: PhantomData<fn() -> P>,
}

impl<T: Trigger, P: Parameters> TriggerWithParameters<T, P> {
    pub(crate) fn new(trigger: T) -> Self {
        Self {
            trigger,
            _params: PhantomData,
        }
    }

    /// The underlying trigger identity.
    pub fn trigger(&self) -> &T {
        &self.trigger
    }
}

impl<T: Trigger, P: Parameters> Clone for TriggerWithParameters<T, P> {
    fn clone(&self) -> Self {
        Self::new(self.trigger.clone())
    }
}

impl<T: Trigger, P: Parameters> fmt::Debug for TriggerWithParameters<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = P::param_types().iter().map(ParamType::name).collect();
        f.debug_struct("TriggerWithParameters")
            .field("trigger", &self.trigger)
            .field("params", &names)
            .finish()
    }
}
