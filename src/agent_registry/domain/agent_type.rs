//! Coordination layer of a workspace agent.

use super::ParseAgentTypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordination layer an agent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    /// Cross-project coordination (integration, architecture, security).
    WorkspaceCoordination,
    /// Bridges between technology stacks (API contracts, data integration).
    TechnologyBridge,
    /// Operational coordination (`DevOps`, SRE, testing, recovery).
    OperationalCoordination,
    /// Governance and compliance (data governance, documentation, workflow).
    GovernanceCompliance,
}

impl AgentType {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WorkspaceCoordination => "workspace_coordination",
            Self::TechnologyBridge => "technology_bridge",
            Self::OperationalCoordination => "operational_coordination",
            Self::GovernanceCompliance => "governance_compliance",
        }
    }

    /// Returns the request keywords this layer specializes in.
    #[must_use]
    pub const fn specialization_keywords(self) -> &'static [&'static str] {
        match self {
            Self::WorkspaceCoordination => &["architecture"],
            Self::TechnologyBridge => &["api", "integration"],
            Self::OperationalCoordination => &["deployment", "monitoring"],
            Self::GovernanceCompliance => &["governance", "documentation"],
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentType {
    type Error = ParseAgentTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "workspace_coordination" => Ok(Self::WorkspaceCoordination),
            "technology_bridge" => Ok(Self::TechnologyBridge),
            "operational_coordination" => Ok(Self::OperationalCoordination),
            "governance_compliance" => Ok(Self::GovernanceCompliance),
            _ => Err(ParseAgentTypeError(value.to_owned())),
        }
    }
}
