//! Errors raised while a machine transitions.

use crate::core::{CloneError, State};
use std::fmt;
use thiserror::Error;

/// The kind of hook that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    InternalLogic,
    ExitAction,
    EventListener,
    StateChangeListener,
    EntryAction,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InternalLogic => "internal logic",
            Self::ExitAction => "exit action",
            Self::EventListener => "event listener",
            Self::StateChangeListener => "state change listener",
            Self::EntryAction => "entry action",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during `go_to_state` and `go_to_error_state`.
///
/// `UnknownState` and `ErrorStateNotSet` are configuration errors and are
/// never worth retrying. A walk aborted by `Clone` or `Hook` leaves the
/// machine wherever the failing hop left it; nothing is rolled back.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("state '{state}' is not registered in machine {machine}")]
    UnknownState { machine: String, state: String },

    #[error("no error state configured for machine {machine}")]
    ErrorStateNotSet { machine: String },

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error("{kind} failed in state '{state}'")]
    Hook {
        kind: HookKind,
        state: String,
        #[source]
        source: anyhow::Error,
    },
}

impl MachineError {
    pub(crate) fn unknown_state<S: State>(machine: &str, state: &S) -> Self {
        Self::UnknownState {
            machine: machine.to_string(),
            state: state.name().to_string(),
        }
    }

    pub(crate) fn hook<S: State>(kind: HookKind, state: &S, source: anyhow::Error) -> Self {
        Self::Hook {
            kind,
            state: state.name().to_string(),
            source,
        }
    }

    /// Misconfiguration rather than a runtime failure.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownState { .. } | Self::ErrorStateNotSet { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        let unknown = MachineError::UnknownState {
            machine: "m-1".to_string(),
            state: "Z".to_string(),
        };
        let unset = MachineError::ErrorStateNotSet {
            machine: "m-1".to_string(),
        };
        let clone: MachineError = CloneError::new("pinned").into();

        assert!(unknown.is_configuration());
        assert!(unset.is_configuration());
        assert!(!clone.is_configuration());
    }

    #[test]
    fn hook_error_keeps_source() {
        let err = MachineError::Hook {
            kind: HookKind::EntryAction,
            state: "Running".to_string(),
            source: anyhow::anyhow!("store unavailable"),
        };

        assert_eq!(err.to_string(), "entry action failed in state 'Running'");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "store unavailable");
    }

    #[test]
    fn clone_error_is_transparent() {
        let err: MachineError = CloneError::new("pinned").into();
        assert_eq!(err.to_string(), "context duplication failed: pinned");
    }
}
