//! Waypoint: a path-seeking state machine engine
//!
//! Instead of firing one event at a time, callers ask a waypoint machine to
//! go to a target state. The machine finds a path through its transition
//! graph and walks it hop by hop, running each state's internal logic, the
//! exit and entry actions, event listeners and a global state change
//! listener, while copying a context value forward from state to state.
//! When the target cannot be reached the machine falls back to its error
//! state.
//!
//! # Core Concepts
//!
//! - **State / Event**: Type-safe identifiers via the `State` and `Event` traits
//! - **Context**: A per-state value slot, duplicated forward on every hop
//! - **Path walking**: Depth-first search in registration order, then one hop per edge
//! - **History**: Immutable record of every hop taken
//!
//! # Example
//!
//! ```rust
//! use waypoint::engine::{StateDefinition, StateMachine};
//! use waypoint::{event_enum, state_enum};
//!
//! state_enum! {
//!     enum Job { Queued, Running, Done, Failed }
//!     final: [Done, Failed]
//!     error: [Failed]
//! }
//!
//! event_enum! {
//!     enum Signal { Start, Finish }
//! }
//!
//! let mut machine: StateMachine<Job, Signal, Vec<&str>, usize> =
//!     StateMachine::builder(Job::Queued, Some(Vec::new()))
//!         .state(
//!             StateDefinition::builder(Job::Queued)
//!                 .transition(Signal::Start, Job::Running)
//!                 .logic(|steps, _machine| {
//!                     let steps: &mut Vec<&str> = steps.expect("context");
//!                     steps.push("queued");
//!                     Ok(Some(steps.len()))
//!                 })
//!                 .build(),
//!         )
//!         .state(
//!             StateDefinition::builder(Job::Running)
//!                 .transition(Signal::Finish, Job::Done)
//!                 .build(),
//!         )
//!         .state(StateDefinition::new(Job::Done))
//!         .error_state(StateDefinition::new(Job::Failed))
//!         .build()
//!         .unwrap();
//!
//! let report = machine.go_to_state(Job::Done).unwrap();
//!
//! assert_eq!(report.path(), &[Job::Queued, Job::Running, Job::Done]);
//! assert_eq!(report.final_result(), Some(&1));
//! assert_eq!(machine.state_context(&Job::Done), Some(&vec!["queued"]));
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod lifecycle;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use core::{CloneError, Context, Duplicate, Event, State, StateHistory, StateTransition};
pub use engine::{MachineError, MachineOptions, StateDefinition, StateMachine, TransitionReport};
