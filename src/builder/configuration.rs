//! Fluent per-state configuration.

use crate::core::{
    ActionResult, EntryFn, ExitFn, Guard, State, StateGraph, Transition, Trigger, TriggerBehaviour,
};
use crate::parameters::{Args, Parameters, TriggerWithParameters};
use tracing::warn;

/// Builder for one state's transitions, actions, and superstate.
///
/// Obtained from `StateMachine::configure`. Every method consumes and returns
/// the builder so calls chain.
///
/// # Example
///
/// ```rust
/// use hsm_engine::StateMachine;
///
/// let mut machine = StateMachine::new("idle");
/// machine
///     .configure("running")
///     .substate_of("active")
///     .permit("pause", "paused")
///     .on_entry(|transition| {
///         println!("started by {:?}", transition.trigger());
///         Ok(())
///     });
/// ```
pub struct StateConfiguration<'a, S: State, T: Trigger> {
    graph: &'a mut StateGraph<S, T>,
    state: S,
}

impl<'a, S: State, T: Trigger> StateConfiguration<'a, S, T> {
    pub(crate) fn new(graph: &'a mut StateGraph<S, T>, state: S) -> Self {
        graph.node_mut(&state);
        Self { graph, state }
    }

    /// The state being configured.
    pub fn state(&self) -> &S {
        &self.state
    }

    fn add(self, trigger: T, behaviour: TriggerBehaviour<S>) -> Self {
        self.graph.node_mut(&self.state).add_behaviour(trigger, behaviour);
        self
    }

    fn permit_guarded(self, trigger: T, destination: S, guard: Guard) -> Self {
        if destination == self.state {
            warn!(
                state = ?self.state,
                trigger = ?trigger,
                "permit targets its own state; use permit_reentry for reentrant transitions"
            );
            self.graph
                .node_mut(&self.state)
                .note_identity_permit(trigger.clone());
        }
        self.add(trigger, TriggerBehaviour::transitioning(destination, guard))
    }

    /// Transition to `destination` when `trigger` fires.
    pub fn permit(self, trigger: T, destination: S) -> Self {
        self.permit_guarded(trigger, destination, Guard::always())
    }

    /// Transition to `destination` when `trigger` fires and `guard` holds.
    pub fn permit_if<G>(self, trigger: T, destination: S, guard: G) -> Self
    where
        G: Fn() -> bool + 'static,
    {
        self.permit_guarded(trigger, destination, Guard::new(guard))
    }

    /// Exit and re-enter this state when `trigger` fires.
    pub fn permit_reentry(self, trigger: T) -> Self {
        let target = self.state.clone();
        self.add(trigger, TriggerBehaviour::transitioning(target, Guard::always()))
    }

    pub fn permit_reentry_if<G>(self, trigger: T, guard: G) -> Self
    where
        G: Fn() -> bool + 'static,
    {
        let target = self.state.clone();
        self.add(trigger, TriggerBehaviour::transitioning(target, Guard::new(guard)))
    }

    /// Accept `trigger` without transitioning or running any action.
    pub fn ignore(self, trigger: T) -> Self {
        self.add(trigger, TriggerBehaviour::ignored(Guard::always()))
    }

    pub fn ignore_if<G>(self, trigger: T, guard: G) -> Self
    where
        G: Fn() -> bool + 'static,
    {
        self.add(trigger, TriggerBehaviour::ignored(Guard::new(guard)))
    }

    /// Transition to a destination chosen when `trigger` fires.
    pub fn permit_dynamic<F>(self, trigger: T, selector: F) -> Self
    where
        F: Fn() -> S + 'static,
    {
        self.add(
            trigger,
            TriggerBehaviour::dynamic(Box::new(move |_: &Args| selector()), Guard::always()),
        )
    }

    pub fn permit_dynamic_if<F, G>(self, trigger: T, selector: F, guard: G) -> Self
    where
        F: Fn() -> S + 'static,
        G: Fn() -> bool + 'static,
    {
        self.add(
            trigger,
            TriggerBehaviour::dynamic(Box::new(move |_: &Args| selector()), Guard::new(guard)),
        )
    }

    /// Transition to a destination computed from the trigger's typed arguments.
    ///
    /// Positions that were not supplied, or supplied with another type, reach
    /// the selector as `None`.
    pub fn permit_dynamic_with<P, F>(self, trigger: &TriggerWithParameters<T, P>, selector: F) -> Self
    where
        P: Parameters,
        F: Fn(P::Unpacked) -> S + 'static,
    {
        self.add(
            trigger.trigger().clone(),
            TriggerBehaviour::dynamic(
                Box::new(move |args: &Args| selector(P::unpack(args))),
                Guard::always(),
            ),
        )
    }

    pub fn permit_dynamic_with_if<P, F, G>(
        self,
        trigger: &TriggerWithParameters<T, P>,
        selector: F,
        guard: G,
    ) -> Self
    where
        P: Parameters,
        F: Fn(P::Unpacked) -> S + 'static,
        G: Fn() -> bool + 'static,
    {
        self.add(
            trigger.trigger().clone(),
            TriggerBehaviour::dynamic(
                Box::new(move |args: &Args| selector(P::unpack(args))),
                Guard::new(guard),
            ),
        )
    }

    fn add_entry(self, scope: Option<T>, action: EntryFn<S, T>) -> Self {
        self.graph.node_mut(&self.state).add_entry_action(scope, action);
        self
    }

    /// Run `action` whenever this state is entered.
    pub fn on_entry<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) -> ActionResult + 'static,
    {
        self.add_entry(
            None,
            Box::new(move |transition: &Transition<S, T>, _: &Args| action(transition)),
        )
    }

    /// Run `action` when this state is entered through `trigger`.
    pub fn on_entry_from<F>(self, trigger: T, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) -> ActionResult + 'static,
    {
        self.add_entry(
            Some(trigger),
            Box::new(move |transition: &Transition<S, T>, _: &Args| action(transition)),
        )
    }

    /// Run `action` on every entry, unpacking the fired arguments as `P`.
    pub fn on_entry_with<P, F>(self, action: F) -> Self
    where
        P: Parameters,
        F: Fn(P::Unpacked, &Transition<S, T>) -> ActionResult + 'static,
    {
        self.add_entry(
            None,
            Box::new(move |transition: &Transition<S, T>, args: &Args| {
                action(P::unpack(args), transition)
            }),
        )
    }

    /// Run `action` when entered through `trigger`, with its typed arguments.
    pub fn on_entry_from_with<P, F>(self, trigger: &TriggerWithParameters<T, P>, action: F) -> Self
    where
        P: Parameters,
        F: Fn(P::Unpacked, &Transition<S, T>) -> ActionResult + 'static,
    {
        self.add_entry(
            Some(trigger.trigger().clone()),
            Box::new(move |transition: &Transition<S, T>, args: &Args| {
                action(P::unpack(args), transition)
            }),
        )
    }

    /// Run `action` whenever this state is exited.
    pub fn on_exit<F>(self, action: F) -> Self
    where
        F: Fn(&Transition<S, T>) -> ActionResult + 'static,
    {
        let action: ExitFn<S, T> = Box::new(action);
        self.graph.node_mut(&self.state).add_exit_action(action);
        self
    }

    /// Declare this state a substate of `superstate`.
    ///
    /// The substate inherits the superstate's trigger handling, and entering or
    /// leaving the superstate's subtree runs its entry and exit actions.
    pub fn substate_of(self, superstate: S) -> Self {
        self.graph.set_superstate(&self.state, &superstate);
        self
    }
}
