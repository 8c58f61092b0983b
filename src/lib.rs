//! # Priority Action Queue
//!
//! A single-flight scheduler that serializes heterogeneous asynchronous
//! "actions" requested by many callers against one shared downstream resource.
//!
//! Actions are grouped by a logical owner id, owner groups are ordered by a
//! mutable numeric priority, and exactly one action is in flight at any
//! instant. This is the mechanism by which the scheduler protects a shared
//! resource (for example a single logical database connection) from
//! concurrent access without pushing locking into that resource.
//!
//! ## Ordering model
//!
//! - Within one owner, actions run in enqueue order (FIFO).
//! - Across owners, strictly by descending priority, re-evaluated on every
//!   dequeue — a priority change takes effect immediately for actions that
//!   are already queued.
//! - Equal-priority owners order by owner-group creation sequence, earliest
//!   first.
//!
//! ## Example
//!
//! ```rust,ignore
//! use priority_action_queue::core::{ActionMetadata, Orchestrator};
//! use priority_action_queue::runtime::TokioSpawner;
//!
//! let scheduler = Orchestrator::new(my_dispatcher, TokioSpawner::current());
//!
//! let handle = scheduler.enqueue(
//!     ActionMetadata::new("dataset-42", 5),
//!     "profile_columns",
//!     vec![serde_json::json!("dataset-42")],
//! );
//!
//! // Cancel everything still pending for an owner; in-flight work is not
//! // retracted.
//! scheduler.clear_queue("dataset-42");
//!
//! let outcome = handle.wait().await;
//! ```
//!
//! ## Key pieces
//!
//! - [`core::IndexedHeap`]: a binary max-heap with a reverse index, giving
//!   O(log n) arbitrary-position update and removal by key.
//! - [`core::ActionQueue`]: FIFO-per-owner grouping layered on the heap, with
//!   lazy tombstone eviction for cancelled owners.
//! - [`core::Orchestrator`]: the cooperative dispatch loop with failure
//!   isolation between unrelated actions.
//!
//! For complete scenarios, see `tests/scheduler_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod core;
pub mod config;
pub mod runtime;
pub mod util;
