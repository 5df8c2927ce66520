//! Error types for request dispatch.

use std::time::Duration;

use crate::agent_registry::{domain::AgentId, ports::AgentError};
use crate::discovery::domain::DiscoveryFailure;
use thiserror::Error;

/// Errors returned when a request could not be handled.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// Discovery found no agent to route to.
    #[error("no route for request: {0}")]
    NoRoute(DiscoveryFailure),

    /// An agent did not answer within the request timeout.
    #[error("agent {agent} timed out after {}ms", .after.as_millis())]
    Timeout {
        /// Agent that timed out.
        agent: AgentId,
        /// Timeout that elapsed.
        after: Duration,
    },

    /// An agent returned an error.
    #[error("agent {agent} failed to process the request")]
    AgentFailed {
        /// Agent that failed.
        agent: AgentId,
        /// Failure reported by the agent.
        #[source]
        source: AgentError,
    },

    /// Every agent in the routing decision failed.
    #[error("all {} routed agents failed", .failures.len())]
    AllAgentsFailed {
        /// One failure per attempted agent, in attempt order.
        failures: Vec<DispatchError>,
    },
}

impl DispatchError {
    /// Returns the agent a single-agent failure refers to.
    #[must_use]
    pub const fn agent(&self) -> Option<&AgentId> {
        match self {
            Self::Timeout { agent, .. } | Self::AgentFailed { agent, .. } => Some(agent),
            Self::NoRoute(_) | Self::AllAgentsFailed { .. } => None,
        }
    }
}
