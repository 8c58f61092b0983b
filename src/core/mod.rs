//! Core scheduling components: heap, owner-group queue, orchestrator.

pub mod dispatcher;
pub mod error;
pub mod heap;
pub mod orchestrator;
pub mod queue;

pub use dispatcher::ActionDispatcher;
pub use error::{ActionError, AppResult};
pub use heap::IndexedHeap;
pub use orchestrator::{Orchestrator, ResultHandle, SchedulerStats};
pub use queue::{
    levels, ActionMetadata, ActionOutcome, ActionQueue, GroupState, OwnerGroup, QueuedAction,
};
