//! Single-flight dispatch loop over the owner-group queue.
//!
//! One orchestrator drives at most one action at a time against an injected
//! [`ActionDispatcher`]. The loop is reentrancy-guarded by an atomic flag;
//! `enqueue`, `clear_queue`, and `update_priority` never block and may be
//! called at any time, including from code running inside the currently
//! dispatched action.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::SchedulerConfig;
use crate::runtime::Spawn;

use super::dispatcher::ActionDispatcher;
use super::error::ActionError;
use super::queue::{ActionMetadata, ActionOutcome, ActionQueue, QueuedAction};

/// Caller-visible handle for one enqueued action.
///
/// Settled exactly once, by whichever of normal dispatch or cancellation
/// happens first.
#[derive(Debug)]
pub struct ResultHandle {
    rx: oneshot::Receiver<ActionOutcome>,
}

impl ResultHandle {
    /// Wait for the action's outcome.
    ///
    /// If the scheduler is torn down before the action runs, this reports
    /// [`ActionError::Cancelled`] rather than hanging.
    pub async fn wait(self) -> ActionOutcome {
        self.rx.await.unwrap_or(Err(ActionError::Cancelled))
    }
}

/// Snapshot of scheduler activity counters.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStats {
    /// Actions dispatched and resolved successfully.
    pub dispatched: u64,
    /// Actions whose dispatch was rejected by the dispatcher.
    pub failed: u64,
    /// Actions cancelled before dispatch.
    pub cancelled: u64,
    /// Actions currently queued.
    pub pending_actions: usize,
    /// Owner groups resident in the queue, tombstones included.
    pub pending_owners: usize,
}

struct Inner<D, S> {
    queue: Mutex<ActionQueue>,
    running: AtomicBool,
    dispatcher: D,
    spawner: S,
    config: SchedulerConfig,
    dispatched: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

/// Priority action scheduler with a single cooperative dispatch loop.
///
/// Cloning is cheap and shares the same queue and loop state; all clones
/// feed one scheduler.
pub struct Orchestrator<D, S> {
    inner: Arc<Inner<D, S>>,
}

impl<D, S> Clone for Orchestrator<D, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D, S> Orchestrator<D, S>
where
    D: ActionDispatcher,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a scheduler with default configuration.
    pub fn new(dispatcher: D, spawner: S) -> Self {
        Self::with_config(SchedulerConfig::default(), dispatcher, spawner)
    }

    /// Create a scheduler with explicit configuration.
    pub fn with_config(config: SchedulerConfig, dispatcher: D, spawner: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue: Mutex::new(ActionQueue::new()),
                running: AtomicBool::new(false),
                dispatcher,
                spawner,
                config,
                dispatched: AtomicU64::new(0),
                failed: AtomicU64::new(0),
                cancelled: AtomicU64::new(0),
            }),
        }
    }

    /// Queue an action for `meta.owner_id` and return its result handle.
    ///
    /// Never blocks. If the dispatch loop is idle it is posted to the
    /// runtime rather than started synchronously, so a same-turn burst of
    /// enqueues is fully queued before the first dequeue.
    pub fn enqueue(
        &self,
        meta: ActionMetadata,
        action: impl Into<String>,
        args: Vec<Value>,
    ) -> ResultHandle {
        let (queued, rx) = QueuedAction::new(action.into(), args);
        let depth = {
            let mut queue = self.inner.queue.lock();
            queue.enqueue(meta, queued);
            queue.len()
        };
        if depth > self.inner.config.warn_queue_depth {
            tracing::warn!(depth, "action backlog exceeds configured warn depth");
        }
        if !self.inner.running.load(Ordering::Acquire) {
            let this = self.clone();
            self.inner.spawner.spawn(async move { this.run().await });
        }
        ResultHandle { rx }
    }

    /// Drive the dispatch loop until the queue is observed empty.
    ///
    /// Idempotent: a call while the loop is already running returns
    /// immediately. Exactly one action is in flight at any instant; a
    /// failing dispatch fails only its own result handle and the loop
    /// proceeds to the next queued action.
    pub async fn run(&self) {
        if self
            .inner
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        tracing::debug!("dispatch loop started");
        loop {
            let next = self.inner.queue.lock().dequeue();
            let Some(action) = next else {
                self.inner.running.store(false, Ordering::Release);
                // An enqueue may have slipped in between the empty
                // observation and the flag clear; retake the loop if so.
                if self.inner.queue.lock().is_empty()
                    || self
                        .inner
                        .running
                        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                        .is_err()
                {
                    tracing::debug!("dispatch loop idle");
                    return;
                }
                continue;
            };

            tracing::debug!(action = action.name(), "dispatching");
            let outcome = self
                .inner
                .dispatcher
                .dispatch(action.name(), action.args())
                .await;
            match outcome {
                Ok(value) => {
                    self.inner.dispatched.fetch_add(1, Ordering::Relaxed);
                    action.resolve(value);
                }
                Err(error) => {
                    self.inner.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(action = action.name(), %error, "dispatch failed");
                    action.reject(ActionError::Dispatch(error));
                }
            }
        }
    }

    /// Cancel every not-yet-dispatched action for `owner_id`.
    ///
    /// Each cancelled action's result handle settles with
    /// [`ActionError::Cancelled`]. An action already in flight is not
    /// retracted. No-op for unknown owners.
    pub fn clear_queue(&self, owner_id: &str) {
        let cancelled = self.inner.queue.lock().clear_queue(owner_id);
        if cancelled.is_empty() {
            return;
        }
        self.inner
            .cancelled
            .fetch_add(cancelled.len() as u64, Ordering::Relaxed);
        tracing::debug!(owner = owner_id, count = cancelled.len(), "cancelling pending actions");
        for action in cancelled {
            action.reject(ActionError::Cancelled);
        }
    }

    /// Change `owner_id`'s scheduling weight for all of its queued actions.
    /// Takes effect on the next dequeue. No-op for unknown owners.
    pub fn update_priority(&self, owner_id: &str, priority: i32) {
        if self.inner.queue.lock().update_priority(owner_id, priority) {
            tracing::debug!(owner = owner_id, priority, "owner reprioritized");
        }
    }

    /// Whether the dispatch loop is currently running.
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Snapshot the scheduler's activity counters and queue depths.
    pub fn stats(&self) -> SchedulerStats {
        let (pending_actions, pending_owners) = {
            let queue = self.inner.queue.lock();
            (queue.len(), queue.resident_owners())
        };
        SchedulerStats {
            dispatched: self.inner.dispatched.load(Ordering::Relaxed),
            failed: self.inner.failed.load(Ordering::Relaxed),
            cancelled: self.inner.cancelled.load(Ordering::Relaxed),
            pending_actions,
            pending_owners,
        }
    }
}
