//! Error types for agent registry domain validation and parsing.

use super::AgentId;
use thiserror::Error;

/// Errors returned while constructing agent registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentDomainError {
    /// The agent identifier is empty after trimming.
    #[error("agent identifier must not be empty")]
    EmptyAgentId,

    /// The agent identifier contains characters outside `[a-z0-9_-]`.
    #[error(
        "agent identifier '{0}' contains invalid characters (only lowercase alphanumeric, hyphens and underscores allowed)"
    )]
    InvalidAgentId(String),

    /// The agent identifier exceeds the 100-character limit.
    #[error("agent identifier exceeds 100 character limit: {0}")]
    AgentIdTooLong(String),

    /// The version string is empty after trimming.
    #[error("agent version must not be empty")]
    EmptyVersion,

    /// The version string has a component that is not a non-negative integer.
    #[error("agent version '{0}' must be dot-separated numeric components")]
    InvalidVersion(String),
}

/// Error returned while parsing a capability from its canonical name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent capability: {0}")]
pub struct ParseAgentCapabilityError(pub String);

/// Error returned while parsing an agent type from its canonical name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent type: {0}")]
pub struct ParseAgentTypeError(pub String);

/// Error returned when a set of agents cannot be ordered because their
/// dependencies form a cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("dependency cycle among agents: {}", join_ids(.0))]
pub struct DependencyCycleError(pub Vec<AgentId>);

/// Renders identifiers as a comma-separated list.
pub(crate) fn join_ids<'a>(ids: impl IntoIterator<Item = &'a AgentId>) -> String {
    ids.into_iter()
        .map(AgentId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
