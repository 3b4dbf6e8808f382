//! Opt-in configuration audit.
//!
//! The engine accepts configurations that can never behave as intended: a
//! superstate chain that loops, a plain permit back to the same state, or two
//! unguarded behaviours for one trigger. None of these are rejected at
//! configuration time. [`StateMachine::audit`](crate::StateMachine::audit)
//! walks every node and collects all such findings in one pass using
//! Stillwater's `Validation`.
//!
//! # Example
//!
//! ```rust
//! use hsm_engine::audit::ConfigIssue;
//! use hsm_engine::StateMachine;
//! use stillwater::validation::Validation;
//!
//! let mut machine = StateMachine::new("idle");
//! machine
//!     .configure("idle")
//!     .permit("poke", "idle")
//!     .permit("go", "running")
//!     .permit("go", "paused");
//!
//! match machine.audit() {
//!     Validation::Failure(issues) => {
//!         assert_eq!(issues.len(), 2);
//!         assert!(issues
//!             .iter()
//!             .any(|issue| matches!(issue, ConfigIssue::IdentityTransition { .. })));
//!     }
//!     Validation::Success(_) => panic!("expected findings"),
//! }
//! ```

mod issues;
mod rules;

pub use issues::ConfigIssue;

use crate::core::{State, StateGraph, Trigger};
use rules::{
    check_acyclic, check_identity_permits, check_unconditional_conflicts, combine, AuditCheck,
};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) fn audit<S: State, T: Trigger>(
    graph: &StateGraph<S, T>,
) -> Validation<(), NonEmptyVec<ConfigIssue>> {
    let mut checks: Vec<AuditCheck> = Vec::new();

    for node in graph.nodes() {
        let state = node.state();
        checks.push(check_acyclic(graph, state));
        checks.push(check_identity_permits(graph, state));
        checks.push(check_unconditional_conflicts(graph, state));
    }

    combine(checks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_graph_passes() {
        let mut graph: StateGraph<&str, &str> = StateGraph::new();
        graph.set_superstate(&"running", &"active");
        graph.node_mut(&"idle").add_behaviour(
            "go",
            crate::core::TriggerBehaviour::transitioning("running", crate::core::Guard::always()),
        );

        assert!(audit(&graph).is_success());
    }

    #[test]
    fn findings_from_every_node_are_accumulated() {
        let mut graph: StateGraph<&str, &str> = StateGraph::new();
        graph.set_superstate(&"a", &"b");
        graph.set_superstate(&"b", &"a");
        graph.node_mut(&"c").note_identity_permit("poke");

        match audit(&graph) {
            Validation::Failure(issues) => {
                let cycles = issues
                    .iter()
                    .filter(|issue| matches!(issue, ConfigIssue::CyclicHierarchy { .. }))
                    .count();
                assert_eq!(cycles, 2);
                assert_eq!(issues.len(), 3);
            }
            Validation::Success(_) => panic!("expected findings"),
        }
    }
}
