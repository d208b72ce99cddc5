//! Run lifecycle wiring on top of the path-walking engine.

use crate::builder::BuildError;
use crate::core::State;
use crate::engine::{MachineError, MachineOptions, StateDefinition, StateMachine, TransitionReport};
use crate::lifecycle::ports::{Dispatcher, Runtime};
use crate::lifecycle::run::{RunEvent, RunOutcome, RunRecord, RunState};
use std::sync::Arc;
use tracing::{debug, warn};

/// The machine driving a single run.
pub type RunMachine = StateMachine<RunState, RunEvent, RunRecord, RunOutcome>;

type Observer = Box<dyn Fn(&RunState, Option<&RunRecord>) -> anyhow::Result<()> + Send + Sync>;

/// Lifecycle of one run.
///
/// `Created -> Built -> Ready -> Running -> Completed`, with
/// `Running -> Stopped` and `Error` as the fallback. Leaving `Created`
/// builds the run spec through the [`Runtime`]; leaving `Built` creates
/// the runnable and hands it to the [`Dispatcher`]. Local runs skip both.
pub struct RunLifecycle {
    machine: RunMachine,
}

impl RunLifecycle {
    pub fn builder(
        run: RunRecord,
        runtime: Arc<dyn Runtime>,
        dispatcher: Arc<dyn Dispatcher>,
    ) -> RunLifecycleBuilder {
        RunLifecycleBuilder {
            run,
            runtime,
            dispatcher,
            observer: None,
            options: MachineOptions::default(),
        }
    }

    /// Drive the run to `target`.
    ///
    /// A failing hook (a runtime that cannot build, a closed dispatcher)
    /// moves the run to `Error` before the failure is returned.
    pub fn go_to(
        &mut self,
        target: RunState,
    ) -> Result<TransitionReport<RunState, RunOutcome>, MachineError> {
        match self.machine.go_to_state(target) {
            Err(err @ MachineError::Hook { .. }) => {
                warn!(
                    machine = %self.machine.id(),
                    state = self.machine.current_state().name(),
                    error = %err,
                    "Run lifecycle hook failed, marking run as failed"
                );
                self.machine.go_to_error_state()?;
                Err(err)
            }
            other => other,
        }
    }

    pub fn state(&self) -> &RunState {
        self.machine.current_state()
    }

    /// The run as the current state sees it, labelled with that state.
    pub fn record(&self) -> Option<RunRecord> {
        let current = self.machine.current_state();
        self.machine
            .state_context(current)
            .or_else(|| self.machine.initial_context())
            .map(|record| RunRecord {
                state: current.clone(),
                ..record.clone()
            })
    }

    pub fn machine(&self) -> &RunMachine {
        &self.machine
    }
}

/// Builder for [`RunLifecycle`].
pub struct RunLifecycleBuilder {
    run: RunRecord,
    runtime: Arc<dyn Runtime>,
    dispatcher: Arc<dyn Dispatcher>,
    observer: Option<Observer>,
    options: MachineOptions,
}

impl RunLifecycleBuilder {
    /// Observe every state change, e.g. to persist the run's state label.
    /// The observer receives the run as it was submitted.
    pub fn observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(&RunState, Option<&RunRecord>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Result<RunLifecycle, BuildError> {
        let run_id = self.run.id.clone();
        let builder = StateMachine::builder(RunState::Created, Some(self.run))
            .id(run_id)
            .options(self.options)
            .state(created(Arc::clone(&self.runtime)))
            .state(built(self.runtime, self.dispatcher))
            .state(
                StateDefinition::builder(RunState::Ready)
                    .transition(RunEvent::Execute, RunState::Running)
                    .build(),
            )
            .state(
                StateDefinition::builder(RunState::Running)
                    .transition(RunEvent::Complete, RunState::Completed)
                    .transition(RunEvent::Stop, RunState::Stopped)
                    .build(),
            )
            .state(StateDefinition::new(RunState::Completed))
            .state(StateDefinition::new(RunState::Stopped))
            .error_state(failed());

        let builder = match self.observer {
            Some(observer) => builder.state_change_listener(observer),
            None => builder,
        };

        Ok(RunLifecycle {
            machine: builder.build()?,
        })
    }
}

fn created(
    runtime: Arc<dyn Runtime>,
) -> StateDefinition<RunState, RunEvent, RunRecord, RunOutcome> {
    StateDefinition::builder(RunState::Created)
        .transition(RunEvent::Build, RunState::Built)
        .logic(move |record: Option<&mut RunRecord>, _machine: &mut RunMachine| {
            let Some(record) = record.filter(|r| !r.local) else {
                return Ok(None);
            };
            let spec = runtime.build(record)?;
            record.spec = spec.clone();
            record.state = RunState::Built;
            debug!(run = %record.id, runtime = runtime.name(), "Run spec built");
            Ok(Some(RunOutcome::Built(spec)))
        })
        .build()
}

fn built(
    runtime: Arc<dyn Runtime>,
    dispatcher: Arc<dyn Dispatcher>,
) -> StateDefinition<RunState, RunEvent, RunRecord, RunOutcome> {
    StateDefinition::builder(RunState::Built)
        .transition(RunEvent::Prepare, RunState::Ready)
        .logic(move |record: Option<&mut RunRecord>, _machine: &mut RunMachine| {
            let Some(record) = record.filter(|r| !r.local) else {
                return Ok(None);
            };
            let runnable = runtime.runnable(record)?;
            dispatcher.dispatch(runnable.clone())?;
            record.state = RunState::Ready;
            debug!(run = %record.id, runnable = %runnable.id, "Runnable dispatched");
            Ok(Some(RunOutcome::Dispatched(runnable)))
        })
        .build()
}

fn failed() -> StateDefinition<RunState, RunEvent, RunRecord, RunOutcome> {
    StateDefinition::builder(RunState::Error)
        .logic(|record: Option<&mut RunRecord>, machine: &mut RunMachine| {
            let run = match record {
                Some(record) => {
                    record.state = RunState::Error;
                    record.id.clone()
                }
                None => machine.id().to_string(),
            };
            Ok(Some(RunOutcome::Failed { run }))
        })
        .build()
}
