//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::validation::validate_configuration;
use crate::core::{Context, Duplicate, Event, State, StateHistory};
use crate::engine::{
    Action, EventListener, MachineOptions, StateChangeListener, StateDefinition, StateMachine,
};
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;
use tracing::debug;
use uuid::Uuid;

/// Builder for constructing state machines with a fluent API.
///
/// Collects states, the error state, listeners, entry/exit actions and the
/// initial context, then validates everything at once in [`build`].
///
/// [`build`]: StateMachineBuilder::build
pub struct StateMachineBuilder<S: State, E: Event, C, R = ()> {
    pub(crate) id: Option<String>,
    pub(crate) initial: S,
    pub(crate) initial_context: Option<C>,
    pub(crate) states: HashMap<S, StateDefinition<S, E, C, R>>,
    pub(crate) duplicates: Vec<S>,
    pub(crate) error_state: Option<S>,
    /// Error state registered by `error_state` that `state` may still replace
    pub(crate) auto_registered: Option<S>,
    pub(crate) event_listeners: HashMap<E, EventListener<C>>,
    pub(crate) state_change_listener: Option<StateChangeListener<S, C>>,
    pub(crate) entry_actions: HashMap<S, Action<C>>,
    pub(crate) exit_actions: HashMap<S, Action<C>>,
    pub(crate) options: MachineOptions,
}

impl<S: State, E: Event, C: Duplicate, R> StateMachineBuilder<S, E, C, R> {
    /// Create a builder for a machine starting in `initial`.
    pub fn new(initial: S, initial_context: Option<C>) -> Self {
        Self {
            id: None,
            initial,
            initial_context,
            states: HashMap::new(),
            duplicates: Vec::new(),
            error_state: None,
            auto_registered: None,
            event_listeners: HashMap::new(),
            state_change_listener: None,
            entry_actions: HashMap::new(),
            exit_actions: HashMap::new(),
            options: MachineOptions::default(),
        }
    }

    /// Use a caller-supplied identifier instead of a random one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Register a state definition.
    ///
    /// Registering the same id twice is a configuration error, except that a
    /// definition registered through [`error_state`] may be replaced once.
    ///
    /// [`error_state`]: StateMachineBuilder::error_state
    pub fn state(mut self, definition: StateDefinition<S, E, C, R>) -> Self {
        let id = definition.id().clone();
        let replaces_error_state = self.auto_registered.as_ref() == Some(&id);
        if replaces_error_state {
            self.auto_registered = None;
        }
        if self.states.insert(id.clone(), definition).is_some() && !replaces_error_state {
            self.duplicates.push(id);
        }
        self
    }

    /// Register several state definitions at once.
    pub fn states(self, definitions: Vec<StateDefinition<S, E, C, R>>) -> Self {
        definitions.into_iter().fold(self, Self::state)
    }

    /// Designate the error state.
    ///
    /// The definition is registered only if no state with the same id has
    /// been registered yet; an existing definition is kept as is.
    pub fn error_state(mut self, definition: StateDefinition<S, E, C, R>) -> Self {
        let id = definition.id().clone();
        if !self.states.contains_key(&id) {
            self.states.insert(id.clone(), definition);
            self.auto_registered = Some(id.clone());
        }
        self.error_state = Some(id);
        self
    }

    /// Listen for an event being fired along a walked edge.
    pub fn event_listener<F>(mut self, event: E, listener: F) -> Self
    where
        F: Fn(Option<&C>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.event_listeners.insert(event, Arc::new(listener));
        self
    }

    /// Listen for every change of the current state.
    pub fn state_change_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&S, Option<&C>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.state_change_listener = Some(Arc::new(listener));
        self
    }

    /// Set the action run when a walk enters `state`.
    pub fn entry_action<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(Option<&C>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.entry_actions.insert(state, Arc::new(action));
        self
    }

    /// Set the action run when a walk leaves `state`.
    pub fn exit_action<F>(mut self, state: S, action: F) -> Self
    where
        F: Fn(Option<&C>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.exit_actions.insert(state, Arc::new(action));
        self
    }

    pub fn options(mut self, options: MachineOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the state machine.
    /// Returns an error listing every configuration violation.
    pub fn build(self) -> Result<StateMachine<S, E, C, R>, BuildError> {
        if let Validation::Failure(violations) = validate_configuration(&self) {
            let mut violations: Vec<_> = violations.iter().cloned().collect();
            violations.sort_by_key(ToString::to_string);
            return Err(BuildError::Invalid(violations));
        }

        let id = self.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        debug!(
            machine = %id,
            initial = self.initial.name(),
            states = self.states.len(),
            "State machine built"
        );

        Ok(StateMachine {
            id,
            current: self.initial,
            error_state: self.error_state,
            states: self.states,
            event_listeners: self.event_listeners,
            state_change_listener: self.state_change_listener,
            entry_actions: self.entry_actions,
            exit_actions: self.exit_actions,
            initial_context: Context::new(self.initial_context),
            options: self.options,
            history: StateHistory::new(),
        })
    }
}
