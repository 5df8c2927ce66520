//! Worker contract implemented by every workspace agent.

use crate::agent_registry::domain::{
    AgentCapability, AgentId, AgentRequest, AgentResponse, AgentStatus, AgentType,
};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a registered agent.
pub type AgentHandle = Arc<dyn WorkspaceAgent>;

/// Result type for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// An in-process worker that offers capabilities and handles requests.
///
/// Implementations must be cheap to query: `status` and
/// `capability_score` are called on every discovery pass.
#[async_trait]
pub trait WorkspaceAgent: fmt::Debug + Send + Sync {
    /// Returns the stable agent identifier.
    fn id(&self) -> &AgentId;

    /// Returns the coordination layer of the agent.
    fn agent_type(&self) -> AgentType;

    /// Returns the capabilities the agent offers.
    fn capabilities(&self) -> BTreeSet<AgentCapability>;

    /// Rates how well the agent handles `capability`, in `0..=100`.
    fn capability_score(&self, capability: AgentCapability) -> u8;

    /// Returns the agents this agent coordinates with, in declaration order.
    fn dependencies(&self) -> Vec<AgentId>;

    /// Returns the current health status.
    fn status(&self) -> AgentStatus;

    /// Handles a request.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when the agent cannot produce a response.
    async fn process(&self, request: &AgentRequest) -> AgentResult<AgentResponse>;

    /// Brings an unhealthy agent back to a usable state.
    ///
    /// The default implementation does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] when reinitialization fails.
    async fn reinitialize(&self) -> AgentResult<()> {
        Ok(())
    }
}

/// Classification of agent failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentErrorKind {
    /// The agent did not answer in time.
    Timeout,
    /// The agent is not accepting work.
    Unavailable,
    /// The agent is misconfigured.
    ConfigurationError,
    /// Coordination with another agent failed.
    CoordinationFailure,
    /// The agent is running below its performance targets.
    PerformanceDegradation,
    /// The agent was asked for a capability it does not offer.
    CapabilityMismatch,
    /// The agent ran out of a resource it needs.
    ResourceExhaustion,
}

impl AgentErrorKind {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Unavailable => "unavailable",
            Self::ConfigurationError => "configuration_error",
            Self::CoordinationFailure => "coordination_failure",
            Self::PerformanceDegradation => "performance_degradation",
            Self::CapabilityMismatch => "capability_mismatch",
            Self::ResourceExhaustion => "resource_exhaustion",
        }
    }
}

impl fmt::Display for AgentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by a workspace agent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("agent {agent} failed ({kind}): {message}")]
pub struct AgentError {
    agent: AgentId,
    kind: AgentErrorKind,
    message: String,
}

impl AgentError {
    /// Creates an agent error.
    #[must_use]
    pub fn new(agent: AgentId, kind: AgentErrorKind, message: impl Into<String>) -> Self {
        Self {
            agent,
            kind,
            message: message.into(),
        }
    }

    /// Returns the failing agent.
    #[must_use]
    pub const fn agent(&self) -> &AgentId {
        &self.agent
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> AgentErrorKind {
        self.kind
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
