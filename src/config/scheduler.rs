//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

const fn default_warn_queue_depth() -> usize {
    1000
}

/// Scheduler configuration.
///
/// The scheduler never rejects or blocks an enqueue; the depth threshold
/// here is observability only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Backlog size above which `enqueue` emits a warning log.
    #[serde(default = "default_warn_queue_depth")]
    pub warn_queue_depth: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            warn_queue_depth: default_warn_queue_depth(),
        }
    }
}

impl SchedulerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.warn_queue_depth == 0 {
            return Err("warn_queue_depth must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
