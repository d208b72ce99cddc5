//! Path discovery over the transition graph.
//!
//! Nodes are state identifiers; every transition of every state is an edge,
//! whatever event labels it. The search is a depth-first search with a
//! visited set, exploring each state's edges in registration order, so the
//! first path found is stable for a given configuration. It is the first
//! path DFS reaches, not necessarily the shortest one.

use crate::core::{Event, State};
use crate::engine::definition::StateDefinition;
use std::collections::{HashMap, HashSet};

/// Find a path from `source` to `target`.
///
/// Returns `[source]` when both are equal and an empty vector when `target`
/// cannot be reached. States missing from the registry have no outgoing
/// edges.
pub(crate) fn find_path<S, E, C, R>(
    states: &HashMap<S, StateDefinition<S, E, C, R>>,
    source: &S,
    target: &S,
) -> Vec<S>
where
    S: State,
    E: Event,
{
    let mut visited = HashSet::new();
    let mut path = Vec::new();

    if dfs(states, source, target, &mut visited, &mut path) {
        path
    } else {
        Vec::new()
    }
}

fn dfs<S, E, C, R>(
    states: &HashMap<S, StateDefinition<S, E, C, R>>,
    current: &S,
    target: &S,
    visited: &mut HashSet<S>,
    path: &mut Vec<S>,
) -> bool
where
    S: State,
    E: Event,
{
    visited.insert(current.clone());
    path.push(current.clone());

    if current == target {
        return true;
    }

    if let Some(definition) = states.get(current) {
        for transition in definition.transitions() {
            let next = transition.next_state();
            if !visited.contains(next) && dfs(states, next, target, visited, path) {
                return true;
            }
        }
    }

    path.pop();
    false
}
