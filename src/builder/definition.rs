//! Builder for constructing state definitions.

use crate::core::{Event, State};
use crate::engine::{InternalLogic, StateDefinition, StateMachine, Transition};
use std::sync::Arc;

/// Builder for constructing a state definition with a fluent API.
pub struct StateDefinitionBuilder<S: State, E: Event, C, R = ()> {
    definition: StateDefinition<S, E, C, R>,
}

impl<S: State, E: Event, C, R> StateDefinitionBuilder<S, E, C, R> {
    /// Create a builder for the state `id`.
    pub fn new(id: S) -> Self {
        Self {
            definition: StateDefinition::new(id),
        }
    }

    /// Add a transition fired by `event` and leading to `next_state`.
    /// Registering the same event twice keeps the later target.
    pub fn transition(mut self, event: E, next_state: S) -> Self {
        self.definition
            .insert_transition(Transition::new(event, next_state));
        self
    }

    /// Set the internal logic using a closure.
    pub fn logic<F>(mut self, logic: F) -> Self
    where
        F: Fn(Option<&mut C>, &mut StateMachine<S, E, C, R>) -> anyhow::Result<Option<R>>
            + Send
            + Sync
            + 'static,
    {
        self.definition.logic = Some(Arc::new(logic));
        self
    }

    /// Set the internal logic from a type implementing [`InternalLogic`].
    pub fn logic_impl<L>(mut self, logic: L) -> Self
    where
        L: InternalLogic<S, E, C, R> + 'static,
    {
        self.definition.logic = Some(Arc::new(logic));
        self
    }

    pub fn build(self) -> StateDefinition<S, E, C, R> {
        self.definition
    }
}
