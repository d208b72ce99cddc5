//! Hop history tracking.
//!
//! Every hop a machine takes (including error fallbacks) is recorded as an
//! immutable [`StateTransition`]. Callers see the [`StateHistory`] as a value:
//! `record` returns a new history. The owning machine appends in place and
//! may cap the number of hops it keeps.

use super::state::{Event, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single hop.
///
/// `event` is the event labeling the edge that was walked, or `None` when the
/// hop had no labeled edge (a self-hop without a self-transition, or a jump
/// to the error state). `fallback` marks jumps to the error state, including
/// one taken while the machine already sits in it.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{Event, State, StateTransition};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Phase { Queued, Running }
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         match self {
///             Self::Queued => "Queued",
///             Self::Running => "Running",
///         }
///     }
/// }
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Signal { Start }
///
/// impl Event for Signal {
///     fn name(&self) -> &str { "start" }
/// }
///
/// let transition = StateTransition {
///     from: Phase::Queued,
///     to: Phase::Running,
///     event: Some(Signal::Start),
///     fallback: false,
///     timestamp: Utc::now(),
/// };
/// assert!(!transition.is_fallback());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State, E: Event> {
    /// The state being left
    pub from: S,
    /// The state being entered
    pub to: S,
    /// The event labeling the walked edge, if any
    pub event: Option<E>,
    /// Whether this was a jump to the error state
    #[serde(default)]
    pub fallback: bool,
    /// When the hop completed
    pub timestamp: DateTime<Utc>,
}

impl<S: State, E: Event> StateTransition<S, E> {
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Ordered history of hops.
///
/// `record` returns a new history with the hop appended; the receiver is
/// left untouched.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    transitions: Vec<StateTransition<S, E>>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a hop, returning a new history.
    pub fn record(&self, transition: StateTransition<S, E>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append a hop in place, keeping at most `limit` of the newest hops.
    pub(crate) fn push(&mut self, transition: StateTransition<S, E>, limit: Option<usize>) {
        self.transitions.push(transition);
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the first hop followed by the `to` state of
    /// every hop.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Events fired so far, in order. Unlabeled hops are skipped.
    pub fn events(&self) -> Vec<&E> {
        self.transitions
            .iter()
            .filter_map(|t| t.event.as_ref())
            .collect()
    }

    /// Time between the first and the last recorded hop.
    ///
    /// `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> &[StateTransition<S, E>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
