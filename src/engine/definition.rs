//! State definitions: a node of the graph with its transition table,
//! context slot and optional internal logic.

use crate::builder::StateDefinitionBuilder;
use crate::core::{Context, Event, State};
use crate::engine::hooks::InternalLogic;
use crate::engine::transition::Transition;
use std::fmt;
use std::sync::Arc;

/// A named node of the machine's graph.
///
/// The transition table keeps registration order, which is also the order
/// path discovery explores edges in. Each event appears at most once.
///
/// The context slot is scratch space overwritten every time a walk passes
/// through this state; it is not a durable record of the state's value.
pub struct StateDefinition<S: State, E: Event, C, R = ()> {
    pub(crate) id: S,
    pub(crate) transitions: Vec<Transition<S, E>>,
    pub(crate) context: Context<C>,
    pub(crate) logic: Option<Arc<dyn InternalLogic<S, E, C, R>>>,
    /// Bumped every time the machine writes a new context into the slot.
    pub(crate) generation: u64,
}

impl<S: State, E: Event, C, R> StateDefinition<S, E, C, R> {
    /// A definition with no transitions and no internal logic.
    pub fn new(id: S) -> Self {
        Self {
            id,
            transitions: Vec::new(),
            context: Context::empty(),
            logic: None,
            generation: 0,
        }
    }

    /// Start a fluent definition.
    pub fn builder(id: S) -> StateDefinitionBuilder<S, E, C, R> {
        StateDefinitionBuilder::new(id)
    }

    pub fn id(&self) -> &S {
        &self.id
    }

    /// Transitions in registration order.
    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.transitions
    }

    /// The transition fired by `event`, if any.
    pub fn transition_for(&self, event: &E) -> Option<&Transition<S, E>> {
        self.transitions.iter().find(|t| t.event() == event)
    }

    /// Reverse lookup: the event of the first registered transition leading
    /// to `target`.
    pub fn transition_to(&self, target: &S) -> Option<&E> {
        self.transitions
            .iter()
            .find(|t| t.leads_to(target))
            .map(Transition::event)
    }

    pub fn context(&self) -> &Context<C> {
        &self.context
    }

    pub fn has_internal_logic(&self) -> bool {
        self.logic.is_some()
    }

    /// Overwrite the context slot.
    pub(crate) fn seed(&mut self, context: Context<C>) {
        self.context = context;
        self.generation += 1;
    }

    /// Add or replace the transition fired by `event`.
    ///
    /// Replacing keeps the original position in the table.
    pub(crate) fn insert_transition(&mut self, transition: Transition<S, E>) {
        match self
            .transitions
            .iter_mut()
            .find(|t| t.event() == transition.event())
        {
            Some(existing) => *existing = transition,
            None => self.transitions.push(transition),
        }
    }
}

impl<S: State, E: Event, C: fmt::Debug, R> fmt::Debug for StateDefinition<S, E, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("id", &self.id)
            .field("transitions", &self.transitions)
            .field("context", &self.context)
            .field("has_internal_logic", &self.logic.is_some())
            .finish()
    }
}
