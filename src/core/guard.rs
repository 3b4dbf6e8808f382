//! Guard predicates for gating trigger behaviours.
//!
//! A guard is a zero-argument predicate. It closes over whatever context it
//! needs and is evaluated fresh on every resolution attempt; results are never
//! cached.

use std::fmt;

/// Zero-argument predicate that decides whether a trigger behaviour is eligible.
///
/// Built by the configuration builder from the closures passed to the
/// `*_if` methods; [`Guard::always`] backs the unguarded forms.
pub(crate) struct Guard {
    predicate: Box<dyn Fn() -> bool>,
    unconditional: bool,
}

impl Guard {
    /// Create a guard from a predicate.
    ///
    /// The predicate should be free of side effects; it may run several
    /// times per `fire` (resolution, `can_fire`, `permitted_triggers`).
    pub(crate) fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            unconditional: false,
        }
    }

    /// A guard that always passes.
    pub(crate) fn always() -> Self {
        Guard {
            predicate: Box::new(|| true),
            unconditional: true,
        }
    }

    /// Evaluate the predicate.
    pub(crate) fn check(&self) -> bool {
        (self.predicate)()
    }

    /// True for guards built with [`Guard::always`].
    pub(crate) fn is_unconditional(&self) -> bool {
        self.unconditional
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("unconditional", &self.unconditional)
            .finish_non_exhaustive()
    }
}
