//! Dispatcher settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for executing routing decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Longest time a single agent may take to process a request, in
    /// milliseconds.
    pub request_timeout_ms: u64,
}

impl DispatchConfig {
    /// Returns the per-agent request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
        }
    }
}
