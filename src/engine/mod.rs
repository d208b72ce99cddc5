//! The path-seeking transition engine.
//!
//! A caller asks the machine to go to a target state. The engine searches the
//! transition graph for a path, then walks it hop by hop:
//!
//! 1. the leaving state's internal logic runs on its context slot
//! 2. the leaving state's exit action fires
//! 3. its context is duplicated into the next state's slot
//! 4. the listener for the walked edge's event fires
//! 5. the current state moves forward and the state change listener fires
//! 6. the entered state's entry action fires
//!
//! If no path exists the machine drops into its error state instead.

mod definition;
mod error;
mod hooks;
mod machine;
mod options;
mod path;
mod report;
mod transition;

pub use definition::StateDefinition;
pub use error::{HookKind, MachineError};
pub use hooks::{Action, EventListener, InternalLogic, StateChangeListener};
pub use machine::StateMachine;
pub use options::{EntryContext, HopResults, MachineOptions};
pub use report::TransitionReport;
pub use transition::Transition;
