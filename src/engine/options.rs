//! Behavior switches for a machine.
//!
//! The defaults give entry actions the destination state's context and
//! collect every hop's internal-logic result. [`MachineOptions::legacy`]
//! restores the older contract: entry actions observe the source state's
//! context and walk results are dropped.
//!
//! History is unbounded unless `history_limit` caps it; a limit of zero turns
//! recording off.

use serde::{Deserialize, Serialize};

/// Which context snapshot an entry action receives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryContext {
    /// The freshly duplicated context of the state being entered
    #[default]
    Destination,
    /// The context of the state being left
    Source,
}

/// What happens to values returned by internal logic during a walk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HopResults {
    /// Keep every produced value in the transition report
    #[default]
    Collect,
    /// Run logic for its side effects only
    Discard,
}

/// Options applied to every transition of a machine.
///
/// Deserializable with defaults for missing fields, so the owning service
/// can carry it in its own configuration file:
///
/// ```rust
/// use waypoint::engine::{EntryContext, HopResults, MachineOptions};
///
/// let options: MachineOptions = serde_json::from_str(r#"{"entry_context":"source"}"#).unwrap();
/// assert_eq!(options.entry_context, EntryContext::Source);
/// assert_eq!(options.hop_results, HopResults::Collect);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineOptions {
    pub entry_context: EntryContext,
    pub hop_results: HopResults,
    /// Keep at most this many of the newest hops in the machine's history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_limit: Option<usize>,
}

impl MachineOptions {
    /// Compatibility mode matching engines that predate the corrected
    /// entry context and result collection.
    pub fn legacy() -> Self {
        Self {
            entry_context: EntryContext::Source,
            hop_results: HopResults::Discard,
            ..Self::default()
        }
    }

    pub fn with_entry_context(mut self, entry_context: EntryContext) -> Self {
        self.entry_context = entry_context;
        self
    }

    pub fn with_hop_results(mut self, hop_results: HopResults) -> Self {
        self.hop_results = hop_results;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub(crate) fn collects_results(&self) -> bool {
        self.hop_results == HopResults::Collect
    }
}
