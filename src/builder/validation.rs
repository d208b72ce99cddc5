//! Build-time validation of a machine configuration.
//!
//! Uses Stillwater's `Validation` to accumulate ALL violations, so a broken
//! configuration is reported in one pass instead of one error per build.

use crate::builder::error::ConfigViolation;
use crate::builder::machine::StateMachineBuilder;
use crate::core::{Event, State};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Validation result accumulating configuration violations.
pub type ConfigValidation = Validation<(), NonEmptyVec<ConfigViolation>>;

/// Check every structural invariant of a configuration.
///
/// - the initial state is registered
/// - no state was registered twice
/// - every transition leads to a registered state
/// - entry and exit actions belong to registered states
pub(crate) fn validate_configuration<S: State, E: Event, C, R>(
    builder: &StateMachineBuilder<S, E, C, R>,
) -> ConfigValidation {
    let mut checks: Vec<ConfigValidation> = Vec::new();

    checks.push(check_initial_state(&builder.initial, builder));

    for state in &builder.duplicates {
        checks.push(Validation::fail(ConfigViolation::DuplicateState(
            state.name().to_string(),
        )));
    }

    for definition in builder.states.values() {
        for transition in definition.transitions() {
            if !builder.states.contains_key(transition.next_state()) {
                checks.push(Validation::fail(ConfigViolation::DanglingTransition {
                    from: definition.id().name().to_string(),
                    event: transition.event().name().to_string(),
                    to: transition.next_state().name().to_string(),
                }));
            }
        }
    }

    checks.extend(check_hook_states("entry", &builder.entry_actions, builder));
    checks.extend(check_hook_states("exit", &builder.exit_actions, builder));

    Validation::all_vec(checks).map(|_| ())
}

fn check_initial_state<S: State, E: Event, C, R>(
    initial: &S,
    builder: &StateMachineBuilder<S, E, C, R>,
) -> ConfigValidation {
    if builder.states.contains_key(initial) {
        Validation::success(())
    } else {
        Validation::fail(ConfigViolation::UnknownInitialState(
            initial.name().to_string(),
        ))
    }
}

fn check_hook_states<S: State, E: Event, C, R, A>(
    hook: &'static str,
    actions: &HashMap<S, A>,
    builder: &StateMachineBuilder<S, E, C, R>,
) -> Vec<ConfigValidation> {
    actions
        .keys()
        .filter(|state| !builder.states.contains_key(*state))
        .map(|state| {
            Validation::fail(ConfigViolation::UnknownHookState {
                hook,
                state: state.name().to_string(),
            })
        })
        .collect()
}
