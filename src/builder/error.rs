//! Build errors for state machines.

use thiserror::Error;

/// A single problem found in a machine configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("initial state '{0}' is not registered. Add it with .state(definition)")]
    UnknownInitialState(String),

    #[error("state '{0}' is registered more than once")]
    DuplicateState(String),

    #[error("transition '{event}' from '{from}' targets unregistered state '{to}'")]
    DanglingTransition {
        from: String,
        event: String,
        to: String,
    },

    #[error("{hook} action registered for unregistered state '{state}'")]
    UnknownHookState { hook: &'static str, state: String },
}

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid state machine configuration: {}", summarize(.0))]
    Invalid(Vec<ConfigViolation>),
}

impl BuildError {
    /// Every violation found, sorted by message.
    pub fn violations(&self) -> &[ConfigViolation] {
        match self {
            Self::Invalid(violations) => violations,
        }
    }
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
