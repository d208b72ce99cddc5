//! Run Lifecycle
//!
//! This example drives a job run from creation to completion.
//!
//! Key concepts:
//! - A runtime port that builds the run spec and the runnable
//! - A channel dispatcher feeding an async worker
//! - An observer persisting state labels
//! - Local runs that skip building and dispatching
//!
//! Run with: RUST_LOG=waypoint=debug cargo run --example run_lifecycle

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use waypoint::lifecycle::{
    ChannelDispatcher, RunLifecycle, RunRecord, RunSpec, RunState, Runnable, Runtime,
};

struct ContainerRuntime;

impl Runtime for ContainerRuntime {
    fn name(&self) -> &str {
        "container"
    }

    fn build(&self, run: &RunRecord) -> Result<RunSpec> {
        let mut spec = RunSpec::new();
        spec.insert("image".to_string(), json!("python:3.11-slim"));
        spec.insert("command".to_string(), json!(["python", "main.py"]));
        spec.insert("task".to_string(), json!(run.task));
        Ok(spec)
    }

    fn runnable(&self, run: &RunRecord) -> Result<Runnable> {
        Ok(Runnable::for_run(run, self.name()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Run Lifecycle ===\n");

    let (dispatcher, mut runnables) = ChannelDispatcher::new();
    let worker = tokio::spawn(async move {
        while let Some(runnable) = runnables.recv().await {
            println!(
                "  [worker] picked up runnable {} for run {}",
                runnable.id, runnable.run
            );
        }
    });

    let runtime: Arc<dyn Runtime> = Arc::new(ContainerRuntime);
    let dispatcher = Arc::new(dispatcher);

    let run = RunRecord::new("task-etl", "container+job");
    let mut lifecycle = RunLifecycle::builder(run, Arc::clone(&runtime), dispatcher.clone())
        .observer(|state, run| {
            if let Some(run) = run {
                println!("  [store] run {} -> {:?}", run.id, state);
            }
            Ok(())
        })
        .build()?;

    println!("Building and dispatching:");
    let report = lifecycle.go_to(RunState::Ready)?;
    println!("  walked {:?}\n", report.path());

    println!("Executing:");
    lifecycle.go_to(RunState::Running)?;
    lifecycle.go_to(RunState::Completed)?;
    if let Some(record) = lifecycle.record() {
        println!("  final record: {}\n", serde_json::to_string_pretty(&record)?);
    }

    println!("Restarting a completed run:");
    let report = lifecycle.go_to(RunState::Running)?;
    println!(
        "  fell back: {}, run is now {:?}\n",
        report.is_fallback(),
        lifecycle.state()
    );

    println!("Local run:");
    let local = RunRecord::new("task-notebook", "container+job").local(true);
    let mut local = RunLifecycle::builder(local, runtime, dispatcher).build()?;
    let report = local.go_to(RunState::Running)?;
    println!(
        "  reached {:?} with {} hook results\n",
        local.state(),
        report.results().len()
    );

    drop(local);
    drop(lifecycle);
    worker.await?;

    println!("=== Example Complete ===");
    Ok(())
}
