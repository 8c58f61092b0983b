//! Runtime adapters for deferring work onto an async executor.

mod tokio_spawner;

pub use tokio_spawner::TokioSpawner;

use std::future::Future;

/// Abstraction for posting a future to a runtime's task queue.
///
/// The orchestrator starts its dispatch loop through this trait rather than
/// polling it inline, so a burst of enqueues on one cooperative turn all
/// land in the queue before the first dequeue runs.
pub trait Spawn {
    /// Spawn an async task.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}
