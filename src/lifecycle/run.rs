//! Run catalog: states, events and the record that flows between states.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

crate::state_enum! {
    /// Lifecycle states of a run.
    pub enum RunState {
        Created,
        Built,
        Ready,
        Running,
        Completed,
        Stopped,
        Error,
    }
    final: [Completed, Stopped, Error]
    error: [Error]
}

crate::event_enum! {
    /// Events labelling the edges of the run lifecycle.
    pub enum RunEvent {
        Build,
        Prepare,
        Execute,
        Complete,
        Stop,
    }
}

/// Runtime-specific specification produced by building a run.
pub type RunSpec = Map<String, Value>;

/// A run as seen by the lifecycle machine.
///
/// This is the context value: every hop hands the next state its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub task: String,
    pub kind: String,
    pub state: RunState,
    #[serde(default)]
    pub spec: RunSpec,
    /// Local runs are executed by the caller and never built or dispatched.
    #[serde(default)]
    pub local: bool,
}

impl RunRecord {
    pub fn new(task: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            task: task.into(),
            kind: kind.into(),
            state: RunState::Created,
            spec: RunSpec::new(),
            local: false,
        }
    }

    pub fn with_spec(mut self, spec: RunSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }
}

/// Unit of work handed to a dispatcher once a run is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Runnable {
    pub id: String,
    pub run: String,
    pub runtime: String,
    pub task: String,
    pub spec: RunSpec,
}

impl Runnable {
    /// Create a runnable for `run` with a fresh id.
    pub fn for_run(run: &RunRecord, runtime: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            run: run.id.clone(),
            runtime: runtime.into(),
            task: run.task.clone(),
            spec: run.spec.clone(),
        }
    }
}

/// Result produced by the lifecycle's internal logic.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Built(RunSpec),
    Dispatched(Runnable),
    Failed { run: String },
}
