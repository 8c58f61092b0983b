//! Owner-grouped priority queue over the indexed heap.
//!
//! Each heap entry is one [`OwnerGroup`]: the owner's scheduling metadata
//! plus a FIFO backlog of that owner's pending actions. Cross-owner ordering
//! is by descending priority; within one owner, strictly enqueue order.
//! Cancellation tombstones a group in place and lets `dequeue` evict it
//! lazily the next time it surfaces at the root.

use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use super::error::ActionError;
use super::heap::IndexedHeap;

/// Well-known scheduling weights used by the surrounding application.
///
/// Plain `i32` values on a shared scale; higher runs first. Callers are free
/// to use any other value.
pub mod levels {
    /// Queries behind the model the user is actively editing.
    pub const ACTIVE_MODEL: i32 = 5;
    /// Profiling for the active model's result set.
    pub const ACTIVE_PROFILE: i32 = 4;
    /// Dataset import and sync work.
    pub const DATASET_IMPORT: i32 = 3;
    /// Profiling for imported datasets.
    pub const DATASET_PROFILE: i32 = 2;
    /// Profiling for models not currently on screen.
    pub const INACTIVE_PROFILE: i32 = 1;
}

/// Identifies which owner a queued action belongs to and that owner's
/// current scheduling weight.
///
/// `owner_id` is stable for the life of an owner group; `priority` is
/// mutable, both through repeat enqueues and through
/// [`ActionQueue::update_priority`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    /// Logical owner under which actions are grouped.
    pub owner_id: String,
    /// Scheduling weight; higher dequeues first.
    pub priority: i32,
}

impl ActionMetadata {
    /// Create metadata for `owner_id` at `priority`.
    pub fn new(owner_id: impl Into<String>, priority: i32) -> Self {
        Self {
            owner_id: owner_id.into(),
            priority,
        }
    }
}

/// Outcome delivered through a result handle: the dispatched value, or a
/// terminal [`ActionError`].
pub type ActionOutcome = Result<Value, ActionError>;

/// One unit of work plus the means to notify its originator.
///
/// Consumed exactly once: either by the dispatch loop on completion, or by
/// cancellation with [`ActionError::Cancelled`].
#[derive(Debug)]
pub struct QueuedAction {
    name: String,
    args: Vec<Value>,
    reply: oneshot::Sender<ActionOutcome>,
}

impl QueuedAction {
    /// Create an action and the receiver its outcome will be delivered on.
    ///
    /// Callers going through [`Orchestrator`](super::Orchestrator) never
    /// build actions directly; this is for driving an [`ActionQueue`] by
    /// hand.
    pub fn new(name: String, args: Vec<Value>) -> (Self, oneshot::Receiver<ActionOutcome>) {
        let (reply, rx) = oneshot::channel();
        (Self { name, args, reply }, rx)
    }

    /// Name of the action to dispatch.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Arguments to pass to the dispatcher.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Deliver a successful dispatch result to the originator.
    pub(crate) fn resolve(self, value: Value) {
        // The caller may have dropped its handle; that is not an error.
        let _ = self.reply.send(Ok(value));
    }

    /// Deliver a terminal failure to the originator.
    pub(crate) fn reject(self, error: ActionError) {
        let _ = self.reply.send(Err(error));
    }
}

/// Lifecycle state of an owner group resident in the heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupState {
    /// The group has pending actions eligible for dispatch.
    Active,
    /// The group's backlog was cancelled; it stays in the heap until it
    /// reaches the root and is evicted.
    Tombstoned,
}

/// Heap-resident record holding one owner's metadata and FIFO backlog.
#[derive(Debug)]
pub struct OwnerGroup {
    pub(crate) meta: ActionMetadata,
    /// Monotonic creation sequence; breaks ties between equal priorities.
    pub(crate) seq: u64,
    pub(crate) state: GroupState,
    pub(crate) actions: VecDeque<QueuedAction>,
}

impl OwnerGroup {
    /// Whether this group has actions eligible for dispatch.
    pub fn has_pending(&self) -> bool {
        self.state == GroupState::Active && !self.actions.is_empty()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// The owner's scheduling metadata.
    pub fn metadata(&self) -> &ActionMetadata {
        &self.meta
    }
}

/// Higher priority outranks lower; equal priorities order by group creation
/// sequence, earliest first. `Greater` means closer to the heap root.
fn schedule_order(a: &OwnerGroup, b: &OwnerGroup) -> Ordering {
    a.meta
        .priority
        .cmp(&b.meta.priority)
        .then_with(|| b.seq.cmp(&a.seq))
}

type GroupCmp = fn(&OwnerGroup, &OwnerGroup) -> Ordering;

/// Priority queue of owner groups.
///
/// Adapts [`IndexedHeap`] to the owner-grouped scheduling model: enqueue by
/// owner, cancel-all for an owner, live priority mutation, and dequeue of
/// the highest-priority owner's oldest pending action.
pub struct ActionQueue {
    heap: IndexedHeap<String, OwnerGroup, GroupCmp>,
    next_seq: u64,
    pending: usize,
}

impl Default for ActionQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: IndexedHeap::new(schedule_order as GroupCmp),
            next_seq: 0,
            pending: 0,
        }
    }

    /// Queue `action` under `meta.owner_id`.
    ///
    /// First enqueue for an owner creates its group; later enqueues append
    /// to the FIFO backlog and adopt `meta.priority` (callers may pass
    /// updated metadata on repeat enqueues). An enqueue for a tombstoned
    /// owner revives the same group in place.
    pub fn enqueue(&mut self, meta: ActionMetadata, action: QueuedAction) {
        self.pending += 1;
        if let Some(group) = self.heap.get_mut(meta.owner_id.as_str()) {
            group.meta.priority = meta.priority;
            group.state = GroupState::Active;
            group.actions.push_back(action);
            self.heap.reposition(meta.owner_id.as_str());
        } else {
            let seq = self.next_seq;
            self.next_seq += 1;
            let key = meta.owner_id.clone();
            let mut actions = VecDeque::with_capacity(1);
            actions.push_back(action);
            self.heap.push(
                key,
                OwnerGroup {
                    meta,
                    seq,
                    state: GroupState::Active,
                    actions,
                },
            );
        }
    }

    /// Remove and return the highest-priority owner's oldest pending action.
    ///
    /// Tombstoned groups encountered at the root are evicted and skipped.
    /// A group drained to its last action is evicted along with that action.
    /// Returns `None` once no pending actions remain.
    pub fn dequeue(&mut self) -> Option<QueuedAction> {
        loop {
            if !self.heap.peek()?.has_pending() {
                self.heap.pop();
                continue;
            }
            let remaining = self.heap.peek().map_or(0, |g| g.actions.len());
            let action = if remaining == 1 {
                self.heap.pop().and_then(|mut group| group.actions.pop_front())
            } else {
                self.heap.peek_mut().and_then(|group| group.actions.pop_front())
            };
            debug_assert!(action.is_some(), "pending group yielded no action");
            if action.is_some() {
                self.pending -= 1;
            }
            return action;
        }
    }

    /// Cancel every pending action for `owner_id`, returning them so the
    /// caller can fail each one. No-op (empty result) for unknown owners.
    ///
    /// The group itself stays in the heap as a tombstone until `dequeue`
    /// next encounters it at the root.
    pub fn clear_queue(&mut self, owner_id: &str) -> Vec<QueuedAction> {
        let Some(group) = self.heap.get_mut(owner_id) else {
            return Vec::new();
        };
        group.state = GroupState::Tombstoned;
        let drained: Vec<QueuedAction> = std::mem::take(&mut group.actions).into_iter().collect();
        self.pending -= drained.len();
        drained
    }

    /// Change `owner_id`'s scheduling weight, repositioning its group.
    /// Returns `false` (no-op) for unknown owners.
    pub fn update_priority(&mut self, owner_id: &str, priority: i32) -> bool {
        let Some(group) = self.heap.get_mut(owner_id) else {
            return false;
        };
        group.meta.priority = priority;
        self.heap.reposition(owner_id)
    }

    /// Total pending actions across all owners.
    pub fn len(&self) -> usize {
        self.pending
    }

    /// Whether no actions are pending. Tombstones awaiting eviction do not
    /// count as pending work.
    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Number of owner groups resident in the heap, tombstones included.
    pub fn resident_owners(&self) -> usize {
        self.heap.len()
    }

    /// Pending actions for one owner. Zero for unknown or tombstoned owners.
    pub fn pending_for(&self, owner_id: &str) -> usize {
        self.heap
            .get(owner_id)
            .filter(|group| group.state == GroupState::Active)
            .map_or(0, |group| group.actions.len())
    }
}
