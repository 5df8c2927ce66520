//! Error types for dependency-ordered loading.

use super::LoadingState;
use crate::agent_registry::{domain::AgentId, ports::AgentError, services::RegistryError};
use thiserror::Error;

/// Errors returned by the dependency loader.
///
/// Every waiter on a shared load receives its own clone of the error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// The agent is not in the registry.
    #[error("agent not registered: {0}")]
    NotRegistered(AgentId),

    /// The agent's loading state does not allow the requested step.
    #[error("agent {agent} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Agent whose state was checked.
        agent: AgentId,
        /// Current state.
        from: LoadingState,
        /// Requested state.
        to: LoadingState,
    },

    /// The agent failed to reinitialize.
    #[error("agent {agent} failed to initialize")]
    InitializationFailed {
        /// Agent being loaded.
        agent: AgentId,
        /// Failure reported by the agent.
        #[source]
        source: AgentError,
    },

    /// A dependency failed to load.
    #[error("agent {agent} could not load dependency {dependency}")]
    DependencyFailed {
        /// Agent being loaded.
        agent: AgentId,
        /// Dependency that failed.
        dependency: AgentId,
        /// Why the dependency failed.
        #[source]
        source: Box<LoadError>,
    },

    /// A dependency was not loaded and healthy after loading finished.
    #[error("agent {agent} has unsatisfied dependency {dependency}")]
    DependencyUnsatisfied {
        /// Agent whose dependency was checked.
        agent: AgentId,
        /// Dependency that is not ready.
        dependency: AgentId,
    },

    /// The registry could not answer.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The task loading the agent ended without a result.
    #[error("load task for agent {0} aborted")]
    TaskAborted(AgentId),

    /// Loads must be started from within a Tokio runtime.
    #[error("no async runtime available to load agent {0}")]
    RuntimeUnavailable(AgentId),

    /// Loader state lock was poisoned.
    #[error("loader state unavailable: {0}")]
    StatePoisoned(String),
}

impl LoadError {
    /// Returns the agent the failure originated from, following dependency
    /// failures down to their root.
    #[must_use]
    pub fn failing_agent(&self) -> Option<&AgentId> {
        match self {
            Self::DependencyFailed { source, .. } => source.failing_agent(),
            Self::NotRegistered(agent)
            | Self::InvalidTransition { agent, .. }
            | Self::InitializationFailed { agent, .. }
            | Self::DependencyUnsatisfied { agent, .. }
            | Self::TaskAborted(agent)
            | Self::RuntimeUnavailable(agent) => Some(agent),
            Self::Registry(_) | Self::StatePoisoned(_) => None,
        }
    }
}

/// Error returned when parsing a [`LoadingState`] fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown loading state: {0}")]
pub struct ParseLoadingStateError(pub String);
