//! Discovery and routing metadata for registered agents.

use super::{AgentCapability, AgentId, AgentType, AgentVersion};
use crate::agent_registry::ports::WorkspaceAgent;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Technologies every workspace agent is assumed to speak.
const BASELINE_TECHNOLOGIES: [&str; 2] = ["rest-api", "jwt"];

/// Metadata the registry keeps for each agent.
///
/// Built with [`AgentMetadata::new`], which derives technology, project and
/// scope defaults from the agent type and capability set. Every derived
/// value can be overridden with the `with_*` builders. The metadata is
/// immutable once registered; a version update replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentMetadata {
    agent_type: AgentType,
    capabilities: BTreeSet<AgentCapability>,
    supported_technologies: BTreeSet<String>,
    supported_projects: BTreeSet<String>,
    cross_project_support: bool,
    workspace_level: bool,
    general_purpose: bool,
    version: AgentVersion,
    required_versions: BTreeMap<AgentId, AgentVersion>,
}

impl AgentMetadata {
    /// Creates metadata with defaults derived from type and capabilities.
    #[must_use]
    pub fn new(
        agent_type: AgentType,
        declared: impl IntoIterator<Item = AgentCapability>,
        version: AgentVersion,
    ) -> Self {
        let capabilities: BTreeSet<AgentCapability> = declared.into_iter().collect();
        Self {
            supported_technologies: default_technologies(agent_type, &capabilities),
            supported_projects: default_projects(agent_type),
            cross_project_support: default_cross_project(agent_type, &capabilities),
            workspace_level: default_workspace_level(agent_type, &capabilities),
            general_purpose: agent_type == AgentType::WorkspaceCoordination
                || capabilities.contains(&AgentCapability::ArchitecturalConsistency),
            agent_type,
            capabilities,
            version,
            required_versions: BTreeMap::new(),
        }
    }

    /// Creates metadata from the type and capabilities an agent declares.
    #[must_use]
    pub fn for_agent(agent: &dyn WorkspaceAgent, version: AgentVersion) -> Self {
        Self::new(agent.agent_type(), agent.capabilities(), version)
    }

    /// Replaces the supported technologies.
    #[must_use]
    pub fn with_technologies<S: Into<String>>(
        mut self,
        technologies: impl IntoIterator<Item = S>,
    ) -> Self {
        self.supported_technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the supported projects.
    #[must_use]
    pub fn with_projects<S: Into<String>>(mut self, projects: impl IntoIterator<Item = S>) -> Self {
        self.supported_projects = projects.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether the agent handles cross-project requests.
    #[must_use]
    pub const fn with_cross_project_support(mut self, supported: bool) -> Self {
        self.cross_project_support = supported;
        self
    }

    /// Sets whether the agent operates at workspace level.
    #[must_use]
    pub const fn with_workspace_level(mut self, workspace_level: bool) -> Self {
        self.workspace_level = workspace_level;
        self
    }

    /// Sets whether the agent accepts requests for any technology.
    #[must_use]
    pub const fn with_general_purpose(mut self, general_purpose: bool) -> Self {
        self.general_purpose = general_purpose;
        self
    }

    /// Declares the version this agent requires of `dependency`.
    #[must_use]
    pub fn with_required_version(mut self, dependency: AgentId, version: AgentVersion) -> Self {
        self.required_versions.insert(dependency, version);
        self
    }

    /// Returns a copy carrying `version`.
    #[must_use]
    pub fn with_version(&self, version: AgentVersion) -> Self {
        Self {
            version,
            ..self.clone()
        }
    }

    /// Returns the agent type.
    #[must_use]
    pub const fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    /// Returns the declared capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<AgentCapability> {
        &self.capabilities
    }

    /// Returns whether the capability is declared.
    #[must_use]
    pub fn has_capability(&self, capability: AgentCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Returns the supported technologies.
    #[must_use]
    pub const fn supported_technologies(&self) -> &BTreeSet<String> {
        &self.supported_technologies
    }

    /// Returns the supported projects.
    #[must_use]
    pub const fn supported_projects(&self) -> &BTreeSet<String> {
        &self.supported_projects
    }

    /// Returns whether `project` is supported.
    #[must_use]
    pub fn supports_project(&self, project: &str) -> bool {
        self.supported_projects.contains(project)
    }

    /// Returns whether every technology in `technologies` is supported,
    /// or the agent is general-purpose.
    #[must_use]
    pub fn covers_technologies(&self, technologies: &BTreeSet<String>) -> bool {
        self.general_purpose || technologies.is_subset(&self.supported_technologies)
    }

    /// Returns whether the agent handles cross-project requests.
    #[must_use]
    pub const fn supports_cross_project(&self) -> bool {
        self.cross_project_support
    }

    /// Returns whether the agent operates at workspace level.
    #[must_use]
    pub const fn is_workspace_level(&self) -> bool {
        self.workspace_level
    }

    /// Returns whether the agent accepts requests for any technology.
    #[must_use]
    pub const fn is_general_purpose(&self) -> bool {
        self.general_purpose
    }

    /// Returns the agent version.
    #[must_use]
    pub const fn version(&self) -> &AgentVersion {
        &self.version
    }

    /// Returns the version required of `dependency`, if declared.
    #[must_use]
    pub fn required_version(&self, dependency: &AgentId) -> Option<&AgentVersion> {
        self.required_versions.get(dependency)
    }

    /// Returns every declared required version.
    #[must_use]
    pub const fn required_versions(&self) -> &BTreeMap<AgentId, AgentVersion> {
        &self.required_versions
    }
}

fn default_technologies(
    agent_type: AgentType,
    capabilities: &BTreeSet<AgentCapability>,
) -> BTreeSet<String> {
    let by_type: &[&str] = match agent_type {
        AgentType::WorkspaceCoordination => &["spring-boot", "moqui", "vue", "postgresql", "aws"],
        AgentType::TechnologyBridge => &["spring-boot", "moqui", "openapi", "graphql"],
        AgentType::OperationalCoordination => {
            &["docker", "aws", "kubernetes", "grafana", "prometheus"]
        }
        AgentType::GovernanceCompliance => &["markdown", "openapi", "json-schema"],
    };

    let by_capability = capabilities.iter().flat_map(|capability| -> &[&str] {
        match capability {
            AgentCapability::ApiContractManagement => &["openapi", "swagger"],
            AgentCapability::DataIntegration => &["postgresql", "mysql", "mongodb"],
            AgentCapability::FrontendBackendBridge => &["vue", "react", "angular"],
            _ => &[],
        }
    });

    BASELINE_TECHNOLOGIES
        .iter()
        .chain(by_type)
        .chain(by_capability)
        .map(|technology| (*technology).to_owned())
        .collect()
}

fn default_projects(agent_type: AgentType) -> BTreeSet<String> {
    let projects: &[&str] = match agent_type {
        AgentType::TechnologyBridge => &["positivity", "moqui_example"],
        AgentType::WorkspaceCoordination
        | AgentType::OperationalCoordination
        | AgentType::GovernanceCompliance => &["positivity", "moqui_example", "workspace"],
    };
    projects.iter().map(|project| (*project).to_owned()).collect()
}

fn default_cross_project(agent_type: AgentType, capabilities: &BTreeSet<AgentCapability>) -> bool {
    matches!(
        agent_type,
        AgentType::WorkspaceCoordination | AgentType::TechnologyBridge
    ) || capabilities.contains(&AgentCapability::FullStackIntegration)
        || capabilities.contains(&AgentCapability::ApiContractManagement)
}

fn default_workspace_level(
    agent_type: AgentType,
    capabilities: &BTreeSet<AgentCapability>,
) -> bool {
    agent_type == AgentType::WorkspaceCoordination
        || capabilities.contains(&AgentCapability::ArchitecturalConsistency)
        || capabilities.contains(&AgentCapability::WorkflowCoordination)
}
