//! Error types for scheduler operations.

use thiserror::Error;

/// Terminal failure delivered through an action's result handle.
///
/// Cancellation is a distinct variant so callers can tell "the scheduler
/// dropped this before it ran" apart from an application-level dispatch
/// failure.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action was cancelled before it was dispatched.
    #[error("action cancelled before dispatch")]
    Cancelled,
    /// The dispatcher rejected the action.
    #[error("dispatch failed: {0}")]
    Dispatch(#[from] anyhow::Error),
}

impl ActionError {
    /// Whether this failure is a cancellation rather than a dispatch error.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
