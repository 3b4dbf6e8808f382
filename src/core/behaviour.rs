//! What firing a trigger does from a given state.

use super::guard::Guard;
use super::state::State;
use crate::parameters::Args;
use std::fmt;

/// Computes a destination from the arguments supplied to `fire`.
pub(crate) type Selector<S> = Box<dyn Fn(&Args) -> S>;

/// The closed set of trigger effects.
pub(crate) enum Effect<S: State> {
    /// Move to a fixed state.
    Transitioning(S),
    /// Handle the trigger without transitioning.
    Ignored,
    /// Move to a state computed at fire time.
    Dynamic(Selector<S>),
}

/// A guarded effect registered for one trigger on one state.
pub(crate) struct TriggerBehaviour<S: State> {
    effect: Effect<S>,
    guard: Guard,
}

impl<S: State> TriggerBehaviour<S> {
    pub(crate) fn transitioning(target: S, guard: Guard) -> Self {
        Self {
            effect: Effect::Transitioning(target),
            guard,
        }
    }

    pub(crate) fn ignored(guard: Guard) -> Self {
        Self {
            effect: Effect::Ignored,
            guard,
        }
    }

    pub(crate) fn dynamic(selector: Selector<S>, guard: Guard) -> Self {
        Self {
            effect: Effect::Dynamic(selector),
            guard,
        }
    }

    pub(crate) fn guard(&self) -> &Guard {
        &self.guard
    }

    pub(crate) fn is_guard_satisfied(&self) -> bool {
        self.guard.check()
    }

    /// Where this behaviour leads, or `None` when the trigger is ignored.
    pub(crate) fn destination(&self, args: &Args) -> Option<S> {
        match &self.effect {
            Effect::Transitioning(target) => Some(target.clone()),
            Effect::Ignored => None,
            Effect::Dynamic(selector) => Some(selector(args)),
        }
    }
}

impl<S: State> fmt::Debug for TriggerBehaviour<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("TriggerBehaviour");
        match &self.effect {
            Effect::Transitioning(target) => out.field("transitioning", target),
            Effect::Ignored => out.field("ignored", &true),
            Effect::Dynamic(_) => out.field("dynamic", &true),
        };
        out.field("guard", &self.guard).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitioning_yields_fixed_target() {
        let behaviour = TriggerBehaviour::transitioning("b", Guard::always());
        assert_eq!(behaviour.destination(&Args::new()), Some("b"));
    }

    #[test]
    fn ignored_yields_no_destination() {
        let behaviour: TriggerBehaviour<&str> = TriggerBehaviour::ignored(Guard::always());
        assert_eq!(behaviour.destination(&Args::new()), None);
    }

    #[test]
    fn dynamic_consults_selector_with_args() {
        let behaviour = TriggerBehaviour::dynamic(
            Box::new(|args: &Args| {
                if args.get::<i32>(0).unwrap_or(0) > 0 {
                    "positive"
                } else {
                    "other"
                }
            }),
            Guard::always(),
        );

        assert_eq!(
            behaviour.destination(&Args::new().with(3i32)),
            Some("positive")
        );
        assert_eq!(behaviour.destination(&Args::new()), Some("other"));
    }

    #[test]
    fn guard_is_independent_of_effect() {
        let behaviour = TriggerBehaviour::transitioning("b", Guard::new(|| false));
        assert!(!behaviour.is_guard_satisfied());
        assert_eq!(behaviour.destination(&Args::new()), Some("b"));
    }
}
