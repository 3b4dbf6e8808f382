//! Identity traits for states and triggers.
//!
//! The engine imposes no structure on states or triggers. Any value that can
//! be cloned, compared, hashed, and debug-printed works: enums, integers,
//! `&'static str`, or small structs.

use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a state in the machine.
///
/// Blanket-implemented for every type meeting the bounds, so callers never
/// implement it by hand.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transitions and the state cell
/// - `Eq` + `Hash`: states key the node arena
/// - `Debug`: states appear in diagnostics and errors
///
/// # Example
///
/// ```rust
/// use hsm_engine::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Screen {
///     Title,
///     Options,
/// }
///
/// fn assert_state<S: State>(_: &S) {}
///
/// assert_state(&Screen::Title);
/// assert_state(&"menu");
/// assert_state(&42u32);
/// ```
pub trait State: Clone + Eq + Hash + Debug + 'static {}

impl<S> State for S where S: Clone + Eq + Hash + Debug + 'static {}

/// Identity of a trigger (an input event).
///
/// Same bounds as [`State`]; also blanket-implemented.
pub trait Trigger: Clone + Eq + Hash + Debug + 'static {}

impl<T> Trigger for T where T: Clone + Eq + Hash + Debug + 'static {}
