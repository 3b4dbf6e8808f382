//! Individual audit checks, one `Validation` per node.

use crate::audit::issues::ConfigIssue;
use crate::core::{State, StateGraph, Trigger};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub(crate) type AuditCheck = Validation<(), NonEmptyVec<ConfigIssue>>;

/// Fold checks into one result, keeping every failure.
pub(crate) fn combine(checks: Vec<AuditCheck>) -> AuditCheck {
    if checks.is_empty() {
        return Validation::success(());
    }
    Validation::all_vec(checks).map(|_| ())
}

/// Walk the superstate chain of `state`, reporting a cycle if `state` is seen
/// again. A chain that loops without passing through `state` is reported
/// from the states on the loop itself.
pub(crate) fn check_acyclic<S: State, T: Trigger>(graph: &StateGraph<S, T>, state: &S) -> AuditCheck {
    let mut visited = HashSet::new();
    let mut current = graph.parent_of(state);
    while let Some(ancestor) = current {
        if ancestor == state {
            return Validation::fail(ConfigIssue::CyclicHierarchy {
                state: format!("{state:?}"),
            });
        }
        if !visited.insert(ancestor) {
            break;
        }
        current = graph.parent_of(ancestor);
    }
    Validation::success(())
}

pub(crate) fn check_identity_permits<S: State, T: Trigger>(
    graph: &StateGraph<S, T>,
    state: &S,
) -> AuditCheck {
    let Some(node) = graph.node(state) else {
        return Validation::success(());
    };

    let checks: Vec<AuditCheck> = node
        .identity_permits()
        .iter()
        .map(|trigger| {
            Validation::fail(ConfigIssue::IdentityTransition {
                state: format!("{state:?}"),
                trigger: format!("{trigger:?}"),
            })
        })
        .collect();

    combine(checks)
}

pub(crate) fn check_unconditional_conflicts<S: State, T: Trigger>(
    graph: &StateGraph<S, T>,
    state: &S,
) -> AuditCheck {
    let Some(node) = graph.node(state) else {
        return Validation::success(());
    };

    let checks: Vec<AuditCheck> = node
        .bindings()
        .map(|(trigger, behaviours)| {
            let count = behaviours
                .iter()
                .filter(|behaviour| behaviour.guard().is_unconditional())
                .count();
            if count > 1 {
                Validation::fail(ConfigIssue::UnconditionalConflict {
                    state: format!("{state:?}"),
                    trigger: format!("{trigger:?}"),
                    count,
                })
            } else {
                Validation::success(())
            }
        })
        .collect();

    combine(checks)
}
