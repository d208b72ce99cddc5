//! Hook contracts invoked while a machine walks a path.
//!
//! Actions and listeners are first-class function values stored behind
//! `Arc`. Internal logic gets its own trait because it is handed the
//! machine itself and may drive further transitions.

use crate::core::{Event, State};
use crate::engine::machine::StateMachine;
use std::sync::Arc;

/// Entry or exit action, keyed by state. Receives a context snapshot.
pub type Action<C> = Arc<dyn Fn(Option<&C>) -> anyhow::Result<()> + Send + Sync>;

/// Listener notified when the edge labeled with its event is walked.
pub type EventListener<C> = Arc<dyn Fn(Option<&C>) -> anyhow::Result<()> + Send + Sync>;

/// Global listener notified after every hop with the new current state and
/// the machine's initial context.
pub type StateChangeListener<S, C> = Arc<dyn Fn(&S, Option<&C>) -> anyhow::Result<()> + Send + Sync>;

/// Logic owned by a state, run when a walk leaves that state.
///
/// The hook receives the state's own context slot, mutably, so changes it
/// makes are carried to the next state of the walk. It also receives the
/// owning machine and may call back into it, for instance to start a nested
/// `go_to_state`.
///
/// Closures with the matching signature implement this trait.
pub trait InternalLogic<S: State, E: Event, C, R>: Send + Sync {
    fn apply(
        &self,
        context: Option<&mut C>,
        machine: &mut StateMachine<S, E, C, R>,
    ) -> anyhow::Result<Option<R>>;
}

impl<S, E, C, R, F> InternalLogic<S, E, C, R> for F
where
    S: State,
    E: Event,
    F: Fn(Option<&mut C>, &mut StateMachine<S, E, C, R>) -> anyhow::Result<Option<R>>
        + Send
        + Sync,
{
    fn apply(
        &self,
        context: Option<&mut C>,
        machine: &mut StateMachine<S, E, C, R>,
    ) -> anyhow::Result<Option<R>> {
        self(context, machine)
    }
}
