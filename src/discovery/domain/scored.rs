//! Ranked discovery candidates.

use crate::agent_registry::{
    domain::{AgentId, AgentMetadata, AgentStatus, RegisteredAgent},
    ports::AgentHandle,
};

/// Highest score a candidate can receive.
pub const MAX_SCORE: u8 = 100;

/// A registered agent with the suitability score it earned for a request.
#[derive(Debug, Clone)]
pub struct ScoredAgent {
    entry: RegisteredAgent,
    status: AgentStatus,
    score: u8,
}

impl ScoredAgent {
    /// Creates a candidate, clamping `score` to `0..=100`.
    #[must_use]
    pub fn new(entry: RegisteredAgent, status: AgentStatus, score: u32) -> Self {
        let clamped = u8::try_from(score.min(u32::from(MAX_SCORE))).unwrap_or(MAX_SCORE);
        Self {
            entry,
            status,
            score: clamped,
        }
    }

    /// Returns the agent identifier.
    #[must_use]
    pub fn id(&self) -> &AgentId {
        self.entry.id()
    }

    /// Returns the agent handle.
    #[must_use]
    pub const fn agent(&self) -> &AgentHandle {
        self.entry.agent()
    }

    /// Returns the registry entry.
    #[must_use]
    pub const fn entry(&self) -> &RegisteredAgent {
        &self.entry
    }

    /// Returns the registered metadata.
    #[must_use]
    pub const fn metadata(&self) -> &AgentMetadata {
        self.entry.metadata()
    }

    /// Returns the status observed when the candidate was scored.
    #[must_use]
    pub const fn status(&self) -> &AgentStatus {
        &self.status
    }

    /// Returns the score in `0..=100`.
    #[must_use]
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Returns the load weight of the observed status in tenths.
    ///
    /// Healthy agents weigh 10, degraded agents 20 and unavailable agents
    /// 100, so lighter agents are preferred when load is balanced.
    #[must_use]
    pub const fn load_factor(&self) -> u32 {
        match self.status {
            AgentStatus::Healthy => 10,
            AgentStatus::Degraded { .. } => 20,
            AgentStatus::Unavailable { .. } => 100,
        }
    }
}
