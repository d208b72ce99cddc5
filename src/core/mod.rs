//! Core value types of the engine.
//!
//! This module contains the plain data the engine manipulates:
//! - State and event identifiers via the `State` and `Event` traits
//! - Duplicable context values
//! - Immutable hop history
//!
//! Nothing in here invokes hooks or mutates a machine.

mod context;
mod history;
mod state;

pub use context::{CloneError, Context, Duplicate};
pub use history::{StateHistory, StateTransition};
pub use state::{Event, State};
