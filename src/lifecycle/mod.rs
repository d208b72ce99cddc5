//! Job run lifecycle built on the path-walking engine.
//!
//! A run is created, built by its runtime, dispatched as a runnable and then
//! driven by whoever executes it:
//!
//! ```text
//! Created --Build--> Built --Prepare--> Ready --Execute--> Running --Complete--> Completed
//!                                                                  \--Stop-----> Stopped
//! ```
//!
//! Any target that cannot be reached lands the run in `Error`. Runtimes and
//! dispatchers are ports; [`ChannelDispatcher`] publishes runnables on a
//! tokio channel for an async worker to pick up.

mod machine;
mod ports;
mod run;

pub use machine::{RunLifecycle, RunLifecycleBuilder, RunMachine};
pub use ports::{ChannelDispatcher, Dispatcher, Runtime};
pub use run::{RunEvent, RunOutcome, RunRecord, RunSpec, RunState, Runnable};
