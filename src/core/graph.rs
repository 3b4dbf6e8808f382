//! Arena of state nodes keyed by state identity.
//!
//! Parent links are stored as keys, never as references, so the hierarchy
//! cannot form ownership cycles. The hierarchy itself is expected to be
//! acyclic; nothing here verifies it (see `audit` for an opt-in check).
//! Walking a cyclic hierarchy does not terminate.

use super::behaviour::TriggerBehaviour;
use super::node::{LocalMatch, StateNode};
use super::state::{State, Trigger};
use super::transition::Transition;
use std::collections::HashMap;
use tracing::warn;

pub(crate) struct StateGraph<S: State, T: Trigger> {
    nodes: HashMap<S, StateNode<S, T>>,
}

impl<S: State, T: Trigger> StateGraph<S, T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    pub(crate) fn node(&self, state: &S) -> Option<&StateNode<S, T>> {
        self.nodes.get(state)
    }

    /// Fetch a node, creating it on first reference.
    pub(crate) fn node_mut(&mut self, state: &S) -> &mut StateNode<S, T> {
        self.nodes
            .entry(state.clone())
            .or_insert_with(|| StateNode::new(state.clone()))
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &StateNode<S, T>> {
        self.nodes.values()
    }

    pub(crate) fn parent_of(&self, state: &S) -> Option<&S> {
        self.nodes.get(state).and_then(StateNode::parent)
    }

    /// Link `substate` under `superstate`.
    pub(crate) fn set_superstate(&mut self, substate: &S, superstate: &S) {
        let previous = self.node_mut(substate).set_parent(superstate.clone());
        if let Some(previous) = previous.filter(|p| p != superstate) {
            warn!(
                state = ?substate,
                previous = ?previous,
                superstate = ?superstate,
                "superstate declared twice, re-linking"
            );
            if let Some(old) = self.nodes.get_mut(&previous) {
                old.remove_child(substate);
            }
        }
        self.node_mut(superstate).add_child(substate.clone());
    }

    /// Resolve the behaviour answering `trigger` in `state`, consulting
    /// ancestors when no local guard is satisfied.
    ///
    /// Two or more satisfied local guards fail resolution at that node without
    /// falling through to the parent.
    pub(crate) fn try_find_handler(&self, state: &S, trigger: &T) -> Option<&TriggerBehaviour<S>> {
        let mut current = Some(state);
        while let Some(state) = current {
            let node = self.nodes.get(state)?;
            match node.find_local(trigger) {
                LocalMatch::Found(behaviour) => return Some(behaviour),
                LocalMatch::Ambiguous(count) => {
                    warn!(
                        state = ?state,
                        trigger = ?trigger,
                        count,
                        "more than one guard satisfied, refusing to pick"
                    );
                    return None;
                }
                LocalMatch::None => current = node.parent(),
            }
        }
        None
    }

    pub(crate) fn can_handle(&self, state: &S, trigger: &T) -> bool {
        self.try_find_handler(state, trigger).is_some()
    }

    /// Guard-satisfied triggers of `state` followed by those of its ancestors,
    /// without duplicates.
    pub(crate) fn permitted_triggers(&self, state: &S) -> Vec<T> {
        let mut permitted: Vec<T> = Vec::new();
        let mut current = self.nodes.get(state);
        while let Some(node) = current {
            for trigger in node.local_permitted() {
                if !permitted.contains(trigger) {
                    permitted.push(trigger.clone());
                }
            }
            current = node.parent().and_then(|parent| self.nodes.get(parent));
        }
        permitted
    }

    /// True when `candidate` is `state` or lies anywhere in its subtree.
    pub(crate) fn includes(&self, state: &S, candidate: &S) -> bool {
        state == candidate
            || self.nodes.get(state).is_some_and(|node| {
                node.children()
                    .iter()
                    .any(|child| self.includes(child, candidate))
            })
    }

    /// True when `candidate` is `state` or one of its ancestors.
    pub(crate) fn is_included_in(&self, state: &S, candidate: &S) -> bool {
        let mut current = Some(state);
        while let Some(state) = current {
            if state == candidate {
                return true;
            }
            current = self.parent_of(state);
        }
        false
    }

    /// States whose exit actions run for `transition`, innermost first.
    pub(crate) fn exit_path(&self, transition: &Transition<S, T>) -> Vec<S> {
        if transition.is_reentry() {
            return vec![transition.source().clone()];
        }

        let mut path = Vec::new();
        let mut current = Some(transition.source());
        while let Some(state) = current {
            if self.includes(state, transition.destination()) {
                break;
            }
            path.push(state.clone());
            current = self.parent_of(state);
        }
        path
    }

    /// States whose entry actions run for `transition`, outermost first.
    pub(crate) fn entry_path(&self, transition: &Transition<S, T>) -> Vec<S> {
        if transition.is_reentry() {
            return vec![transition.destination().clone()];
        }

        let mut path = Vec::new();
        let mut current = Some(transition.destination());
        while let Some(state) = current {
            if self.includes(state, transition.source()) {
                break;
            }
            path.push(state.clone());
            current = self.parent_of(state);
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;
    use crate::parameters::Args;

    type Graph = StateGraph<&'static str, &'static str>;

    /// root
    /// ├── a
    /// │   ├── a1
    /// │   └── a2
    /// └── b
    ///     └── b1
    fn tree() -> Graph {
        let mut graph = Graph::new();
        graph.set_superstate(&"a", &"root");
        graph.set_superstate(&"b", &"root");
        graph.set_superstate(&"a1", &"a");
        graph.set_superstate(&"a2", &"a");
        graph.set_superstate(&"b1", &"b");
        graph
    }

    fn permit(graph: &mut Graph, state: &'static str, trigger: &'static str, to: &'static str) {
        graph
            .node_mut(&state)
            .add_behaviour(trigger, TriggerBehaviour::transitioning(to, Guard::always()));
    }

    #[test]
    fn includes_walks_the_subtree() {
        let graph = tree();
        assert!(graph.includes(&"root", &"a2"));
        assert!(graph.includes(&"a", &"a1"));
        assert!(graph.includes(&"a", &"a"));
        assert!(!graph.includes(&"a", &"b1"));
        assert!(!graph.includes(&"a1", &"a"));
    }

    #[test]
    fn is_included_in_walks_the_parent_chain() {
        let graph = tree();
        assert!(graph.is_included_in(&"a1", &"a"));
        assert!(graph.is_included_in(&"a1", &"root"));
        assert!(graph.is_included_in(&"a1", &"a1"));
        assert!(!graph.is_included_in(&"a1", &"b"));
        assert!(!graph.is_included_in(&"a", &"a1"));
    }

    #[test]
    fn unknown_state_is_only_included_in_itself() {
        let graph = tree();
        assert!(graph.is_included_in(&"zzz", &"zzz"));
        assert!(!graph.is_included_in(&"zzz", &"root"));
    }

    #[test]
    fn handler_is_inherited_from_ancestors() {
        let mut graph = tree();
        permit(&mut graph, "root", "reset", "a1");

        assert!(graph.can_handle(&"b1", &"reset"));
        assert!(graph.can_handle(&"a2", &"reset"));
        assert!(!graph.can_handle(&"b1", &"unknown"));
    }

    #[test]
    fn local_handler_shadows_ancestor() {
        let mut graph = tree();
        permit(&mut graph, "root", "go", "a1");
        permit(&mut graph, "b1", "go", "a2");

        let behaviour = graph.try_find_handler(&"b1", &"go").unwrap();
        assert_eq!(behaviour.destination(&Args::new()), Some("a2"));
    }

    #[test]
    fn ambiguity_does_not_fall_through_to_parent() {
        let mut graph = tree();
        permit(&mut graph, "root", "go", "a1");
        permit(&mut graph, "b1", "go", "a2");
        permit(&mut graph, "b1", "go", "b");

        assert!(graph.try_find_handler(&"b1", &"go").is_none());
        assert!(graph.can_handle(&"b", &"go"));
    }

    #[test]
    fn permitted_triggers_union_ancestors_without_duplicates() {
        let mut graph = tree();
        permit(&mut graph, "root", "reset", "a1");
        permit(&mut graph, "root", "go", "a1");
        permit(&mut graph, "b", "go", "a2");
        permit(&mut graph, "b1", "next", "b");

        assert_eq!(graph.permitted_triggers(&"b1"), vec!["next", "go", "reset"]);
        assert_eq!(graph.permitted_triggers(&"a1"), vec!["reset", "go"]);
        assert!(graph.permitted_triggers(&"unknown").is_empty());
    }

    #[test]
    fn sibling_transition_exits_and_enters_below_common_ancestor() {
        let graph = tree();
        let transition = Transition::new("a1", "a2", "t");

        assert_eq!(graph.exit_path(&transition), vec!["a1"]);
        assert_eq!(graph.entry_path(&transition), vec!["a2"]);
    }

    #[test]
    fn cross_hierarchy_transition_walks_both_chains() {
        let graph = tree();
        let transition = Transition::new("a1", "b1", "t");

        assert_eq!(graph.exit_path(&transition), vec!["a1", "a"]);
        assert_eq!(graph.entry_path(&transition), vec!["b", "b1"]);
    }

    #[test]
    fn moving_into_own_substate_does_not_exit_self() {
        let graph = tree();
        let transition = Transition::new("a", "a1", "t");

        assert!(graph.exit_path(&transition).is_empty());
        assert_eq!(graph.entry_path(&transition), vec!["a1"]);
    }

    #[test]
    fn moving_out_to_superstate_does_not_enter_it() {
        let graph = tree();
        let transition = Transition::new("a1", "a", "t");

        assert_eq!(graph.exit_path(&transition), vec!["a1"]);
        assert!(graph.entry_path(&transition).is_empty());
    }

    #[test]
    fn reentry_touches_only_the_state_itself() {
        let graph = tree();
        let transition = Transition::new("a1", "a1", "t");

        assert_eq!(graph.exit_path(&transition), vec!["a1"]);
        assert_eq!(graph.entry_path(&transition), vec!["a1"]);
    }

    #[test]
    fn unrelated_unconfigured_states_exit_and_enter_themselves() {
        let graph = Graph::new();
        let transition = Transition::new("x", "y", "t");

        assert_eq!(graph.exit_path(&transition), vec!["x"]);
        assert_eq!(graph.entry_path(&transition), vec!["y"]);
    }

    #[test]
    fn redeclaring_superstate_relinks_child() {
        let mut graph = tree();
        graph.set_superstate(&"a1", &"b");

        assert_eq!(graph.parent_of(&"a1"), Some(&"b"));
        assert!(!graph.includes(&"a", &"a1"));
        assert!(graph.includes(&"b", &"a1"));
    }
}
