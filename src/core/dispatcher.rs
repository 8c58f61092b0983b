//! Action execution boundary trait.

use async_trait::async_trait;
use serde_json::Value;

use super::AppResult;

/// Abstraction for executing one named action against the protected resource.
///
/// The orchestrator has no knowledge of what actions do; it hands the action
/// name and arguments to the dispatcher and routes the outcome back to the
/// original caller. Retries, if desired, belong to the dispatcher or to the
/// caller re-enqueuing — the scheduler itself never retries.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use priority_action_queue::core::{ActionDispatcher, AppResult};
/// use serde_json::Value;
///
/// #[derive(Clone)]
/// struct DatabaseDispatcher {
///     conn: Connection,
/// }
///
/// #[async_trait]
/// impl ActionDispatcher for DatabaseDispatcher {
///     async fn dispatch(&self, action: &str, args: &[Value]) -> AppResult<Value> {
///         match action {
///             "profile_columns" => self.conn.profile(args).await,
///             other => anyhow::bail!("unknown action `{other}`"),
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait ActionDispatcher: Send + Sync + Clone + 'static {
    /// Execute `action` with `args` and return its result.
    ///
    /// A returned error fails only the originating caller's result handle;
    /// the dispatch loop continues with the next queued action.
    async fn dispatch(&self, action: &str, args: &[Value]) -> AppResult<Value>;
}
