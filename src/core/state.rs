//! Identifier traits for state machine states and events.
//!
//! States and events are plain values (usually fieldless enums) that name the
//! nodes and edge labels of a machine's transition graph. They carry no
//! behavior of their own beyond naming and classification.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine state identifiers.
///
/// All methods are pure. A state identifier is a key into the machine's
/// registry, so it must be hashable and comparable.
///
/// # Required Traits
///
/// - `Clone`: identifiers are copied into paths and history records
/// - `Eq` + `Hash`: identifiers key the state registry and hook maps
/// - `Debug`: identifiers appear in diagnostics
/// - `Serialize` + `Deserialize`: history records are serializable
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum RunState {
///     Created,
///     Running,
///     Completed,
///     Error,
/// }
///
/// impl State for RunState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Created => "Created",
///             Self::Running => "Running",
///             Self::Completed => "Completed",
///             Self::Error => "Error",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Completed | Self::Error)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Error)
///     }
/// }
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// This is a classification only; the machine's fallback target is
    /// whatever the builder registered as its error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

/// Trait for the events that label transitions.
///
/// Events key the transition table of a state and the machine's event
/// listeners.
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
