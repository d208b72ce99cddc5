//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate. Configuration is validated as a whole when the
//! machine is built.

pub mod definition;
pub mod error;
pub mod machine;
pub mod macros;
pub mod validation;

pub use definition::StateDefinitionBuilder;
pub use error::{BuildError, ConfigViolation};
pub use machine::StateMachineBuilder;
pub use validation::ConfigValidation;

use crate::core::{Event, State};
use crate::engine::StateDefinition;

/// Create the definitions of a linear chain of states.
///
/// Each `(state, event)` pair gets one transition, fired by `event`, to the
/// next state of the list; `last` gets no transitions.
///
/// # Example
///
/// ```
/// use waypoint::builder::chain;
/// use waypoint::engine::StateMachine;
/// use waypoint::{event_enum, state_enum};
///
/// state_enum! {
///     enum Light { Red, Green, Yellow }
/// }
///
/// event_enum! {
///     enum Signal { Go, Slow }
/// }
///
/// let machine: StateMachine<Light, Signal, ()> = StateMachine::builder(Light::Red, None)
///     .states(chain(vec![(Light::Red, Signal::Go), (Light::Green, Signal::Slow)], Light::Yellow))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.find_path(&Light::Red, &Light::Yellow).len(), 3);
/// ```
pub fn chain<S, E, C, R>(steps: Vec<(S, E)>, last: S) -> Vec<StateDefinition<S, E, C, R>>
where
    S: State,
    E: Event,
{
    let mut targets: Vec<S> = steps.iter().skip(1).map(|(s, _)| s.clone()).collect();
    targets.push(last.clone());

    let mut definitions: Vec<StateDefinition<S, E, C, R>> = steps
        .into_iter()
        .zip(targets)
        .map(|((state, event), next)| {
            StateDefinitionBuilder::new(state)
                .transition(event, next)
                .build()
        })
        .collect();
    definitions.push(StateDefinition::new(last));
    definitions
}
