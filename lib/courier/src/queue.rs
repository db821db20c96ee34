//! Completion contexts.
//!
//! Every call ends with exactly one invocation of its completion closure. A
//! [`CompletionQueue`] decides where that invocation runs:
//!
//! - [`Immediate`] runs it on the runtime worker that resolved the call,
//! - [`MainQueue`] hands it to a [`MainQueueRunner`] drained by one thread,
//! - [`RuntimeQueue`] runs it on the runtime's blocking pool.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// A completion ready to run.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where completions are executed.
pub trait CompletionQueue: Send + Sync + 'static {
    /// Schedule `job`. Implementations must run it exactly once.
    fn dispatch(&self, job: Job);
}

impl<Q: CompletionQueue + ?Sized> CompletionQueue for Arc<Q> {
    fn dispatch(&self, job: Job) {
        (**self).dispatch(job);
    }
}

/// Runs completions inline, on whichever thread finished the call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl CompletionQueue for Immediate {
    fn dispatch(&self, job: Job) {
        job();
    }
}

/// Runs completions on the Tokio blocking pool.
///
/// Suited to completions that do blocking work.
#[derive(Debug, Clone)]
pub struct RuntimeQueue {
    handle: Handle,
}

impl RuntimeQueue {
    /// Queue backed by the given runtime.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl CompletionQueue for RuntimeQueue {
    fn dispatch(&self, job: Job) {
        drop(self.handle.spawn_blocking(job));
    }
}

/// Sending half of a single-consumer completion queue.
///
/// Completions are serialized onto whichever thread drives the paired
/// [`MainQueueRunner`], typically the application's main or UI thread.
#[derive(Debug, Clone)]
pub struct MainQueue {
    sender: mpsc::UnboundedSender<Job>,
}

/// Receiving half of a [`MainQueue`].
#[derive(Debug)]
pub struct MainQueueRunner {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl MainQueue {
    /// Creates a queue and the runner that drains it.
    #[must_use]
    pub fn new() -> (Self, MainQueueRunner) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, MainQueueRunner { receiver })
    }
}

impl CompletionQueue for MainQueue {
    fn dispatch(&self, job: Job) {
        if let Err(mpsc::error::SendError(job)) = self.sender.send(job) {
            // Runner dropped: run here rather than lose the completion
            tracing::warn!("main queue runner is gone, running completion inline");
            job();
        }
    }
}

impl MainQueueRunner {
    /// Runs every completion already queued, without waiting.
    ///
    /// Returns how many completions ran.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            count += 1;
        }
        count
    }

    /// Blocks the current thread until one completion arrives and runs it.
    ///
    /// Returns `false` once every [`MainQueue`] handle is dropped and the
    /// queue is empty. Must not be called from inside an async context.
    pub fn run_one_blocking(&mut self) -> bool {
        match self.receiver.blocking_recv() {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Runs completions as they arrive until every [`MainQueue`] handle is dropped.
    pub async fn run(mut self) {
        while let Some(job) = self.receiver.recv().await {
            job();
        }
    }
}
