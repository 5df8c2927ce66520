//! Registry entry for a workspace agent.

use super::{AgentId, AgentMetadata};
use crate::agent_registry::ports::AgentHandle;
use chrono::{DateTime, Utc};
use mockable::Clock;

/// An agent together with the metadata it was registered with.
#[derive(Debug, Clone)]
pub struct RegisteredAgent {
    agent: AgentHandle,
    metadata: AgentMetadata,
    registered_at: DateTime<Utc>,
}

impl RegisteredAgent {
    /// Creates a registry entry stamped with the current time.
    #[must_use]
    pub fn new(agent: AgentHandle, metadata: AgentMetadata, clock: &impl Clock) -> Self {
        Self {
            agent,
            metadata,
            registered_at: clock.utc(),
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub fn id(&self) -> &AgentId {
        self.agent.id()
    }

    /// Returns the agent handle.
    #[must_use]
    pub const fn agent(&self) -> &AgentHandle {
        &self.agent
    }

    /// Returns the registered metadata.
    #[must_use]
    pub const fn metadata(&self) -> &AgentMetadata {
        &self.metadata
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Replaces the metadata, keeping the registration timestamp.
    pub(crate) fn replace_metadata(&mut self, metadata: AgentMetadata) {
        self.metadata = metadata;
    }
}
