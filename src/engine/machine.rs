//! The path-walking state machine.

use crate::builder::StateMachineBuilder;
use crate::core::{Context, Duplicate, Event, State, StateHistory, StateTransition};
use crate::engine::definition::StateDefinition;
use crate::engine::error::{HookKind, MachineError};
use crate::engine::hooks::{Action, EventListener, StateChangeListener};
use crate::engine::options::{EntryContext, MachineOptions};
use crate::engine::path;
use crate::engine::report::TransitionReport;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, debug_span, info, warn};

/// State machine that walks multi-hop paths to a requested target.
///
/// A machine is owned by a single caller (typically one per job) and every
/// operation takes `&mut self`; concurrent use requires an external lock
/// around the whole machine. All hooks run inline on the calling thread.
///
/// Built with [`StateMachineBuilder`], which validates the configuration;
/// after that the registry and the hook tables are read-only.
pub struct StateMachine<S: State, E: Event, C, R = ()> {
    pub(crate) id: String,
    pub(crate) current: S,
    pub(crate) error_state: Option<S>,
    pub(crate) states: HashMap<S, StateDefinition<S, E, C, R>>,
    pub(crate) event_listeners: HashMap<E, EventListener<C>>,
    pub(crate) state_change_listener: Option<StateChangeListener<S, C>>,
    pub(crate) entry_actions: HashMap<S, Action<C>>,
    pub(crate) exit_actions: HashMap<S, Action<C>>,
    pub(crate) initial_context: Context<C>,
    pub(crate) options: MachineOptions,
    pub(crate) history: StateHistory<S, E>,
}

impl<S: State, E: Event, C: Duplicate, R> StateMachine<S, E, C, R> {
    /// Start building a machine that begins in `initial`.
    pub fn builder(initial: S, initial_context: Option<C>) -> StateMachineBuilder<S, E, C, R> {
        StateMachineBuilder::new(initial, initial_context)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_state(&self) -> &S {
        &self.current
    }

    pub fn error_state(&self) -> Option<&S> {
        self.error_state.as_ref()
    }

    pub fn is_in_error_state(&self) -> bool {
        self.error_state.as_ref() == Some(&self.current)
    }

    pub fn initial_context(&self) -> Option<&C> {
        self.initial_context.get()
    }

    /// Current content of a state's context slot.
    ///
    /// The slot holds whatever the latest walk through that state left there.
    pub fn state_context(&self, state: &S) -> Option<&C> {
        self.states.get(state).and_then(|d| d.context.get())
    }

    pub fn definition(&self, state: &S) -> Option<&StateDefinition<S, E, C, R>> {
        self.states.get(state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.states.keys()
    }

    pub fn options(&self) -> &MachineOptions {
        &self.options
    }

    /// Every hop taken so far, fallbacks included.
    pub fn history(&self) -> &StateHistory<S, E> {
        &self.history
    }

    /// The path a `go_to_state(target)` from `source` would walk (pure)
    pub fn find_path(&self, source: &S, target: &S) -> Vec<S> {
        path::find_path(&self.states, source, target)
    }

    /// Walk from the current state to `target`.
    ///
    /// Fails fast with [`MachineError::UnknownState`] if `target` is not
    /// registered. When `target` is registered but unreachable the machine
    /// moves to its error state instead and the report is marked as a
    /// fallback.
    ///
    /// When `target` is the current state the walk is a single self-hop: the
    /// state's logic, exit and entry actions each run once.
    pub fn go_to_state(&mut self, target: S) -> Result<TransitionReport<S, R>, MachineError> {
        self.registered(&target)?;

        let span = debug_span!(
            "go_to_state",
            machine = %self.id,
            from = self.current.name(),
            to = target.name()
        );
        let _guard = span.enter();

        let path = self.find_path(&self.current, &target);
        if path.is_empty() {
            let from = self.current.clone();
            warn!(
                machine = %self.id,
                from = from.name(),
                to = target.name(),
                "No path to target, falling back to error state"
            );
            let error_state = self.enter_error_state()?;
            let result = self.run_internal_logic(&error_state)?;
            return Ok(TransitionReport::fallback(from, error_state, result));
        }

        let first = path[0].clone();
        let seeded = self.initial_context.duplicate()?;
        self.registered_mut(&first)?.seed(seeded);

        let hops: Vec<(S, S)> = if path.len() == 1 {
            vec![(first.clone(), first)]
        } else {
            path.windows(2)
                .map(|pair| (pair[0].clone(), pair[1].clone()))
                .collect()
        };

        let mut results = Vec::new();
        for (from, to) in hops {
            if let Some(result) = self.run_internal_logic(&from)? {
                if self.options.collects_results() {
                    results.push((from.clone(), result));
                }
            }
            self.hop(&from, &to)?;
        }

        info!(
            machine = %self.id,
            state = self.current.name(),
            hops = path.len().saturating_sub(1).max(1),
            "Transition complete"
        );
        Ok(TransitionReport::walked(path, results))
    }

    /// Move straight to the error state and run its internal logic.
    ///
    /// Copies the current state's context into the error state's slot. No
    /// entry/exit actions or listeners fire. Fails with a configuration error
    /// if no error state is set or it is not registered.
    pub fn go_to_error_state(&mut self) -> Result<Option<R>, MachineError> {
        let from = self.current.clone();
        let error_state = self.enter_error_state()?;
        warn!(
            machine = %self.id,
            from = from.name(),
            error_state = error_state.name(),
            "Entered error state"
        );
        self.run_internal_logic(&error_state)
    }

    /// Run a state's internal logic against its own context slot.
    ///
    /// The hook works on a duplicate of the slot while the slot itself stays
    /// in place. The duplicate is written back afterwards unless a nested
    /// operation reseeded the slot during the call. Returns `Ok(None)` when
    /// the state has no logic.
    pub fn run_internal_logic(&mut self, state: &S) -> Result<Option<R>, MachineError> {
        let definition = self.registered(state)?;
        let Some(logic) = definition.logic.clone() else {
            return Ok(None);
        };
        let generation = definition.generation;
        let mut working = definition.context.duplicate()?;

        let outcome = logic.apply(working.get_mut(), self);

        if let Some(definition) = self.states.get_mut(state) {
            if definition.generation == generation {
                definition.context = working;
            } else {
                debug!(
                    machine = %self.id,
                    state = state.name(),
                    "Context reseeded during internal logic, keeping the newer one"
                );
            }
        }
        outcome.map_err(|source| MachineError::hook(HookKind::InternalLogic, state, source))
    }

    /// Jump to the error state and record the fallback hop.
    fn enter_error_state(&mut self) -> Result<S, MachineError> {
        let error_state = self
            .error_state
            .clone()
            .ok_or_else(|| MachineError::ErrorStateNotSet {
                machine: self.id.clone(),
            })?;
        self.registered(&error_state)?;

        let from = self.current.clone();
        let copy = self.registered(&from)?.context.duplicate()?;
        self.registered_mut(&error_state)?.seed(copy);

        self.current = error_state.clone();
        self.record(&from, &error_state, None, true);
        Ok(error_state)
    }

    /// One hop from `from` to `to`, internal logic excluded.
    fn hop(&mut self, from: &S, to: &S) -> Result<(), MachineError> {
        if let Some(action) = self.exit_actions.get(from) {
            action(self.state_context(from))
                .map_err(|source| MachineError::hook(HookKind::ExitAction, from, source))?;
        }

        let copy = self.registered(from)?.context.duplicate()?;
        self.registered_mut(to)?.seed(copy);

        let event = self.registered(from)?.transition_to(to).cloned();
        if let Some(listener) = event.as_ref().and_then(|e| self.event_listeners.get(e)) {
            listener(self.state_context(from))
                .map_err(|source| MachineError::hook(HookKind::EventListener, from, source))?;
        }

        self.current = to.clone();
        self.record(from, to, event, false);
        debug!(
            machine = %self.id,
            from = from.name(),
            to = to.name(),
            "Hop complete"
        );

        if let Some(listener) = &self.state_change_listener {
            listener(to, self.initial_context.get())
                .map_err(|source| MachineError::hook(HookKind::StateChangeListener, to, source))?;
        }

        if let Some(action) = self.entry_actions.get(to) {
            let context = match self.options.entry_context {
                EntryContext::Destination => self.state_context(to),
                EntryContext::Source => self.state_context(from),
            };
            action(context)
                .map_err(|source| MachineError::hook(HookKind::EntryAction, to, source))?;
        }

        Ok(())
    }

    fn record(&mut self, from: &S, to: &S, event: Option<E>, fallback: bool) {
        let transition = StateTransition {
            from: from.clone(),
            to: to.clone(),
            event,
            fallback,
            timestamp: Utc::now(),
        };
        self.history.push(transition, self.options.history_limit);
    }

    fn registered(&self, state: &S) -> Result<&StateDefinition<S, E, C, R>, MachineError> {
        self.states
            .get(state)
            .ok_or_else(|| MachineError::unknown_state(&self.id, state))
    }

    fn registered_mut(
        &mut self,
        state: &S,
    ) -> Result<&mut StateDefinition<S, E, C, R>, MachineError> {
        match self.states.get_mut(state) {
            Some(definition) => Ok(definition),
            None => Err(MachineError::unknown_state(&self.id, state)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::options::HopResults;
    use crate::{event_enum, state_enum};
    use std::sync::{Arc, Mutex};

    state_enum! {
        enum Phase {
            Created,
            Built,
            Running,
            Done,
            Failed,
        }
        final: [Done, Failed]
        error: [Failed]
    }

    event_enum! {
        enum Signal {
            Build,
            Run,
            Finish,
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;
    type Machine = StateMachine<Phase, Signal, Vec<String>, String>;

    fn push(log: &Log, entry: impl Into<String>) {
        log.lock().unwrap().push(entry.into());
    }

    fn machine(log: &Log, options: MachineOptions) -> Machine {
        let mut builder = StateMachine::builder(Phase::Created, Some(vec!["seed".to_string()]))
            .options(options)
            .error_state(
                StateDefinition::builder(Phase::Failed)
                    .logic(|ctx: Option<&mut Vec<String>>, _m: &mut Machine| {
                        Ok(Some(format!("failed after {}", ctx.map_or(0, |c| c.len()))))
                    })
                    .build(),
            );

        for (state, event, next) in [
            (Phase::Created, Signal::Build, Phase::Built),
            (Phase::Built, Signal::Run, Phase::Running),
            (Phase::Running, Signal::Finish, Phase::Done),
        ] {
            let name = state.name().to_string();
            builder = builder.state(
                StateDefinition::builder(state)
                    .transition(event, next)
                    .logic(move |ctx: Option<&mut Vec<String>>, _m: &mut Machine| {
                        if let Some(ctx) = ctx {
                            ctx.push(name.clone());
                        }
                        Ok(Some(name.clone()))
                    })
                    .build(),
            );
        }
        builder = builder.state(StateDefinition::new(Phase::Done));

        for state in [Phase::Built, Phase::Running, Phase::Done] {
            let log = Arc::clone(log);
            let name = state.name().to_string();
            builder = builder.entry_action(state, move |ctx: Option<&Vec<String>>| {
                push(&log, format!("enter {} {:?}", name, ctx.cloned().unwrap_or_default()));
                Ok(())
            });
        }

        builder.build().unwrap()
    }

    #[test]
    fn walks_full_path_and_collects_results() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());

        let report = machine.go_to_state(Phase::Done).unwrap();

        assert_eq!(machine.current_state(), &Phase::Done);
        assert_eq!(
            report.path(),
            &[Phase::Created, Phase::Built, Phase::Running, Phase::Done]
        );
        assert_eq!(report.final_result().map(String::as_str), Some("Running"));
        assert_eq!(report.results().len(), 3);
        assert_eq!(
            machine.state_context(&Phase::Done),
            Some(&vec![
                "seed".to_string(),
                "Created".to_string(),
                "Built".to_string(),
                "Running".to_string()
            ])
        );
    }

    /// Context whose every copy is one generation newer than its source.
    #[derive(Debug, PartialEq)]
    struct Generation(u32);

    impl Duplicate for Generation {
        fn duplicate(&self) -> Result<Self, crate::core::CloneError> {
            Ok(Generation(self.0 + 1))
        }
    }

    fn generation_machine(
        options: MachineOptions,
        seen: &Arc<Mutex<Vec<u32>>>,
    ) -> StateMachine<Phase, Signal, Generation, ()> {
        let seen = Arc::clone(seen);
        StateMachine::builder(Phase::Created, Some(Generation(0)))
            .options(options)
            .state(
                StateDefinition::builder(Phase::Created)
                    .transition(Signal::Build, Phase::Built)
                    .build(),
            )
            .state(StateDefinition::new(Phase::Built))
            .entry_action(Phase::Built, move |ctx: Option<&Generation>| {
                seen.lock().unwrap().push(ctx.map_or(0, |g| g.0));
                Ok(())
            })
            .build()
            .unwrap()
    }

    #[test]
    fn entry_action_sees_destination_context_by_default() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut machine = generation_machine(MachineOptions::default(), &seen);

        machine.go_to_state(Phase::Built).unwrap();

        // Created holds generation 1 (seeded copy), Built holds its copy.
        assert_eq!(machine.state_context(&Phase::Created), Some(&Generation(1)));
        assert_eq!(machine.state_context(&Phase::Built), Some(&Generation(2)));
        assert_eq!(seen.lock().unwrap().as_slice(), &[2]);
    }

    #[test]
    fn legacy_entry_action_sees_source_context() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut machine = generation_machine(MachineOptions::legacy(), &seen);

        machine.go_to_state(Phase::Built).unwrap();

        assert_eq!(seen.lock().unwrap().as_slice(), &[1]);
    }

    #[test]
    fn legacy_mode_discards_walk_results() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::legacy());

        let report = machine.go_to_state(Phase::Running).unwrap();

        assert!(report.results().is_empty());
        assert_eq!(machine.current_state(), &Phase::Running);
    }

    #[test]
    fn initial_context_is_never_touched_by_a_walk() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());

        machine.go_to_state(Phase::Done).unwrap();

        assert_eq!(machine.initial_context(), Some(&vec!["seed".to_string()]));
    }

    #[test]
    fn unreachable_target_falls_back_to_error_state() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());
        machine.go_to_state(Phase::Done).unwrap();

        let report = machine.go_to_state(Phase::Created).unwrap();

        assert!(report.is_fallback());
        assert!(machine.is_in_error_state());
        assert_eq!(report.path(), &[Phase::Done, Phase::Failed]);
        assert_eq!(
            report.final_result().map(String::as_str),
            Some("failed after 4")
        );
        assert!(machine.history().transitions().last().unwrap().is_fallback());
    }

    #[test]
    fn unknown_target_fails_fast() {
        let mut machine: StateMachine<Phase, Signal, (), ()> =
            StateMachine::builder(Phase::Created, None)
                .state(StateDefinition::new(Phase::Created))
                .build()
                .unwrap();

        let err = machine.go_to_state(Phase::Running).unwrap_err();

        assert!(matches!(err, MachineError::UnknownState { .. }));
        assert_eq!(machine.current_state(), &Phase::Created);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn missing_error_state_is_configuration_error() {
        let mut machine: StateMachine<Phase, Signal, (), ()> =
            StateMachine::builder(Phase::Created, None)
                .state(StateDefinition::new(Phase::Created))
                .state(StateDefinition::new(Phase::Done))
                .build()
                .unwrap();

        let err = machine.go_to_state(Phase::Done).unwrap_err();

        assert!(matches!(err, MachineError::ErrorStateNotSet { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn discard_mode_keeps_error_result() {
        let log = Log::default();
        let options = MachineOptions::default().with_hop_results(HopResults::Discard);
        let mut machine = machine(&log, options);

        let report = machine.go_to_state(Phase::Done).unwrap();
        assert!(report.final_result().is_none());

        let result = machine.go_to_error_state().unwrap();
        assert_eq!(result.as_deref(), Some("failed after 4"));
    }

    #[test]
    fn history_follows_walk() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());

        machine.go_to_state(Phase::Running).unwrap();

        assert_eq!(
            machine.history().get_path(),
            vec![&Phase::Created, &Phase::Built, &Phase::Running]
        );
        assert_eq!(
            machine.history().events(),
            vec![&Signal::Build, &Signal::Run]
        );
    }

    #[test]
    fn history_limit_keeps_newest_hops() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default().with_history_limit(1));

        machine.go_to_state(Phase::Done).unwrap();

        assert_eq!(
            machine.history().get_path(),
            vec![&Phase::Running, &Phase::Done]
        );
    }

    #[test]
    fn zero_history_limit_records_nothing() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default().with_history_limit(0));

        machine.go_to_state(Phase::Done).unwrap();
        machine.go_to_error_state().unwrap();

        assert!(machine.history().is_empty());
        assert!(machine.is_in_error_state());
    }

    #[test]
    fn repeated_fallback_from_error_state_is_flagged() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());
        machine.go_to_error_state().unwrap();

        let report = machine.go_to_state(Phase::Created).unwrap();

        assert!(report.is_fallback());
        let last = machine.history().transitions().last().unwrap();
        assert_eq!((&last.from, &last.to), (&Phase::Failed, &Phase::Failed));
        assert!(last.is_fallback());
        assert_eq!(
            machine.history().transitions().iter().filter(|t| t.is_fallback()).count(),
            2
        );
    }

    #[test]
    fn nested_reseed_survives_outer_logic() {
        type Nested = StateMachine<Phase, Signal, Vec<String>, ()>;

        // With an empty slot the logic walks on, which reseeds Created and
        // runs the logic again on the fresh context.
        let mut machine: Nested = StateMachine::builder(Phase::Created, Some(vec!["seed".to_string()]))
            .state(
                StateDefinition::builder(Phase::Created)
                    .transition(Signal::Build, Phase::Built)
                    .logic(|ctx: Option<&mut Vec<String>>, m: &mut Nested| {
                        match ctx {
                            Some(ctx) => ctx.push("nested".to_string()),
                            None => {
                                m.go_to_state(Phase::Built)?;
                            }
                        }
                        Ok(None)
                    })
                    .build(),
            )
            .state(StateDefinition::new(Phase::Built))
            .build()
            .unwrap();

        machine.run_internal_logic(&Phase::Created).unwrap();

        assert_eq!(machine.current_state(), &Phase::Built);
        assert_eq!(
            machine.state_context(&Phase::Created),
            Some(&vec!["seed".to_string(), "nested".to_string()])
        );
    }

    #[test]
    fn logic_writes_are_kept_without_reseed() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());

        machine.go_to_state(Phase::Built).unwrap();

        assert_eq!(
            machine.state_context(&Phase::Created),
            Some(&vec!["seed".to_string(), "Created".to_string()])
        );
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn fallback_warns_once() {
        let log = Log::default();
        let mut machine = machine(&log, MachineOptions::default());
        machine.go_to_state(Phase::Done).unwrap();

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            machine.go_to_state(Phase::Created).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let warnings: Vec<&str> = output.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 1, "{output}");
        assert!(warnings[0].contains("No path to target"));
    }
}
