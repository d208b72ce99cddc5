//! Event-labeled edges of the transition graph.

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};

/// A directed edge: firing `event` in the owning state leads to `next_state`.
///
/// Transitions are immutable once built and live in exactly one state's
/// transition table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, E: Event> {
    event: E,
    next_state: S,
}

impl<S: State, E: Event> Transition<S, E> {
    pub fn new(event: E, next_state: S) -> Self {
        Self { event, next_state }
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn next_state(&self) -> &S {
        &self.next_state
    }

    /// Check whether this edge leads to `state` (pure)
    pub fn leads_to(&self, state: &S) -> bool {
        self.next_state == *state
    }
}
