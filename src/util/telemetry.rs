//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Default log directive when `RUST_LOG` is unset: scheduler events at
/// debug, everything else at warn.
const DEFAULT_DIRECTIVE: &str = "warn,priority_action_queue=debug";

/// Initialize tracing for the scheduler. Users can install their own
/// subscriber first; this is a no-op once any dispatcher is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
