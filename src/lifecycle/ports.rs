//! Collaborator ports used by the run lifecycle.

use crate::lifecycle::run::{RunRecord, RunSpec, Runnable};
use anyhow::anyhow;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Runtime able to build and run a kind of run.
pub trait Runtime: Send + Sync {
    fn name(&self) -> &str;

    /// Produce the runtime-specific spec of a run.
    fn build(&self, run: &RunRecord) -> anyhow::Result<RunSpec>;

    /// Turn a built run into a unit of work.
    fn runnable(&self, run: &RunRecord) -> anyhow::Result<Runnable>;
}

/// Fire-and-forget sink for runnables.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, runnable: Runnable) -> anyhow::Result<()>;
}

impl<F> Dispatcher for F
where
    F: Fn(Runnable) -> anyhow::Result<()> + Send + Sync,
{
    fn dispatch(&self, runnable: Runnable) -> anyhow::Result<()> {
        self(runnable)
    }
}

/// Dispatcher publishing runnables on an unbounded tokio channel.
///
/// Sending never blocks, so it is safe to call from synchronous hooks; the
/// receiving half is typically drained by an async worker.
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    sender: UnboundedSender<Runnable>,
}

impl ChannelDispatcher {
    pub fn new() -> (Self, UnboundedReceiver<Runnable>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Dispatcher for ChannelDispatcher {
    fn dispatch(&self, runnable: Runnable) -> anyhow::Result<()> {
        self.sender
            .send(runnable)
            .map_err(|err| anyhow!("dispatch channel closed, dropped runnable {}", err.0.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runnable() -> Runnable {
        Runnable::for_run(&RunRecord::new("task-1", "container+job"), "container")
    }

    #[tokio::test]
    async fn channel_dispatcher_delivers_in_order() {
        let (dispatcher, mut receiver) = ChannelDispatcher::new();
        let first = runnable();
        let second = runnable();

        dispatcher.dispatch(first.clone()).unwrap();
        dispatcher.dispatch(second.clone()).unwrap();

        assert_eq!(receiver.recv().await, Some(first));
        assert_eq!(receiver.recv().await, Some(second));
    }

    #[tokio::test]
    async fn closed_channel_is_an_error() {
        let (dispatcher, receiver) = ChannelDispatcher::new();
        drop(receiver);

        let err = dispatcher.dispatch(runnable()).unwrap_err();
        assert!(err.to_string().contains("dispatch channel closed"));
    }

    #[test]
    fn closures_are_dispatchers() {
        let dispatcher = |runnable: Runnable| {
            if runnable.task == "task-1" {
                Ok(())
            } else {
                Err(anyhow!("unexpected task"))
            }
        };

        assert!(dispatcher.dispatch(runnable()).is_ok());
    }
}
