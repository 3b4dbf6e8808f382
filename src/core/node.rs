//! Per-state data: trigger bindings, entry/exit actions, and hierarchy links.

use super::behaviour::TriggerBehaviour;
use super::state::{State, Trigger};
use super::transition::Transition;
use crate::parameters::Args;
use std::collections::HashMap;
use std::error::Error;

/// Error raised by an entry action, exit action, or transition observer.
pub type ActionError = Box<dyn Error + Send + Sync>;

/// Result of running an action or observer.
pub type ActionResult = Result<(), ActionError>;

pub(crate) type EntryFn<S, T> = Box<dyn Fn(&Transition<S, T>, &Args) -> ActionResult>;
pub(crate) type ExitFn<S, T> = Box<dyn Fn(&Transition<S, T>) -> ActionResult>;

struct EntryAction<S: State, T: Trigger> {
    scope: Option<T>,
    action: EntryFn<S, T>,
}

impl<S: State, T: Trigger> EntryAction<S, T> {
    fn applies_to(&self, transition: &Transition<S, T>) -> bool {
        self.scope
            .as_ref()
            .is_none_or(|trigger| trigger == transition.trigger())
    }
}

/// Outcome of looking up a trigger among a node's own bindings.
pub(crate) enum LocalMatch<'a, S: State> {
    None,
    Found(&'a TriggerBehaviour<S>),
    Ambiguous(usize),
}

pub(crate) struct StateNode<S: State, T: Trigger> {
    state: S,
    parent: Option<S>,
    children: Vec<S>,
    trigger_order: Vec<T>,
    behaviours: HashMap<T, Vec<TriggerBehaviour<S>>>,
    entry_actions: Vec<EntryAction<S, T>>,
    exit_actions: Vec<ExitFn<S, T>>,
    identity_permits: Vec<T>,
}

impl<S: State, T: Trigger> StateNode<S, T> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            parent: None,
            children: Vec::new(),
            trigger_order: Vec::new(),
            behaviours: HashMap::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            identity_permits: Vec::new(),
        }
    }

    pub(crate) fn state(&self) -> &S {
        &self.state
    }

    pub(crate) fn parent(&self) -> Option<&S> {
        self.parent.as_ref()
    }

    pub(crate) fn children(&self) -> &[S] {
        &self.children
    }

    /// Replace the parent link, returning the previous one.
    pub(crate) fn set_parent(&mut self, parent: S) -> Option<S> {
        self.parent.replace(parent)
    }

    pub(crate) fn add_child(&mut self, child: S) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    pub(crate) fn remove_child(&mut self, child: &S) {
        self.children.retain(|c| c != child);
    }

    pub(crate) fn add_behaviour(&mut self, trigger: T, behaviour: TriggerBehaviour<S>) {
        if !self.behaviours.contains_key(&trigger) {
            self.trigger_order.push(trigger.clone());
        }
        self.behaviours.entry(trigger).or_default().push(behaviour);
    }

    pub(crate) fn add_entry_action(&mut self, scope: Option<T>, action: EntryFn<S, T>) {
        self.entry_actions.push(EntryAction { scope, action });
    }

    pub(crate) fn add_exit_action(&mut self, action: ExitFn<S, T>) {
        self.exit_actions.push(action);
    }

    pub(crate) fn note_identity_permit(&mut self, trigger: T) {
        self.identity_permits.push(trigger);
    }

    /// Triggers registered with a non-reentrant permit back to this state.
    pub(crate) fn identity_permits(&self) -> &[T] {
        &self.identity_permits
    }

    /// Bindings in trigger registration order.
    pub(crate) fn bindings(&self) -> impl Iterator<Item = (&T, &[TriggerBehaviour<S>])> {
        self.trigger_order.iter().filter_map(|trigger| {
            self.behaviours
                .get(trigger)
                .map(|behaviours| (trigger, behaviours.as_slice()))
        })
    }

    /// Evaluate every local guard for `trigger` and classify the result.
    pub(crate) fn find_local(&self, trigger: &T) -> LocalMatch<'_, S> {
        let Some(candidates) = self.behaviours.get(trigger) else {
            return LocalMatch::None;
        };

        let satisfied: Vec<&TriggerBehaviour<S>> = candidates
            .iter()
            .filter(|behaviour| behaviour.is_guard_satisfied())
            .collect();

        match satisfied.as_slice() {
            [] => LocalMatch::None,
            [only] => LocalMatch::Found(only),
            _ => LocalMatch::Ambiguous(satisfied.len()),
        }
    }

    /// Triggers with at least one guard-satisfied local behaviour.
    pub(crate) fn local_permitted(&self) -> impl Iterator<Item = &T> {
        self.bindings().filter_map(|(trigger, behaviours)| {
            behaviours
                .iter()
                .any(TriggerBehaviour::is_guard_satisfied)
                .then_some(trigger)
        })
    }

    pub(crate) fn execute_entry_actions(
        &self,
        transition: &Transition<S, T>,
        args: &Args,
    ) -> ActionResult {
        for entry in &self.entry_actions {
            if entry.applies_to(transition) {
                (entry.action)(transition, args)?;
            }
        }
        Ok(())
    }

    pub(crate) fn execute_exit_actions(&self, transition: &Transition<S, T>) -> ActionResult {
        for action in &self.exit_actions {
            action(transition)?;
        }
        Ok(())
    }
}
