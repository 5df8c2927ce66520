//! Agent health status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point-in-time health of a workspace agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent is available and healthy.
    Healthy,
    /// The agent still accepts work but is not healthy.
    Degraded {
        /// Why the agent is degraded.
        reason: String,
    },
    /// The agent does not accept work.
    Unavailable {
        /// Why the agent is unavailable.
        reason: String,
    },
}

impl AgentStatus {
    /// Creates a degraded status.
    #[must_use]
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded {
            reason: reason.into().trim().to_owned(),
        }
    }

    /// Creates an unavailable status.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into().trim().to_owned(),
        }
    }

    /// Returns whether the agent is healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// Returns whether the agent accepts work.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded { .. })
    }

    /// Returns the canonical state name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Degraded { .. } => "degraded",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str(self.as_str()),
            Self::Degraded { reason } | Self::Unavailable { reason } => {
                write!(f, "{}: {reason}", self.as_str())
            }
        }
    }
}
