//! Capabilities that workspace agents declare.

use super::ParseAgentCapabilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named functional competency a workspace agent can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentCapability {
    /// Coordinates changes spanning backend, frontend and infrastructure.
    FullStackIntegration,
    /// Keeps architectural decisions consistent across projects.
    ArchitecturalConsistency,
    /// Coordinates authentication, authorization and security reviews.
    SecurityCoordination,
    /// Coordinates performance work across layers.
    PerformanceOptimization,
    /// Manages API contracts between producers and consumers.
    ApiContractManagement,
    /// Coordinates data flows between systems.
    DataIntegration,
    /// Bridges frontend and backend technology stacks.
    FrontendBackendBridge,
    /// Coordinates build and release pipelines.
    DevopsCoordination,
    /// Unifies logging, metrics and tracing.
    ObservabilityUnification,
    /// Coordinates cross-project testing.
    TestingCoordination,
    /// Plans and validates disaster recovery.
    DisasterRecovery,
    /// Enforces data governance policies.
    DataGovernance,
    /// Coordinates documentation across projects.
    DocumentationCoordination,
    /// Coordinates multi-step workflows.
    WorkflowCoordination,
    /// Coordinates deployments across environments.
    DeploymentCoordination,
    /// Integrates monitoring systems.
    MonitoringIntegration,
    /// Enforces compliance requirements.
    ComplianceEnforcement,
    /// Coordinates change management.
    ChangeCoordination,
    /// Plans for concurrent user load.
    ConcurrentUserSupport,
    /// Handles growth of the workspace.
    WorkspaceGrowthHandling,
    /// Optimizes response times.
    ResponseTimeOptimization,
    /// Manages service availability.
    AvailabilityManagement,
}

impl AgentCapability {
    /// Every capability, in declaration order.
    pub const ALL: [Self; 22] = [
        Self::FullStackIntegration,
        Self::ArchitecturalConsistency,
        Self::SecurityCoordination,
        Self::PerformanceOptimization,
        Self::ApiContractManagement,
        Self::DataIntegration,
        Self::FrontendBackendBridge,
        Self::DevopsCoordination,
        Self::ObservabilityUnification,
        Self::TestingCoordination,
        Self::DisasterRecovery,
        Self::DataGovernance,
        Self::DocumentationCoordination,
        Self::WorkflowCoordination,
        Self::DeploymentCoordination,
        Self::MonitoringIntegration,
        Self::ComplianceEnforcement,
        Self::ChangeCoordination,
        Self::ConcurrentUserSupport,
        Self::WorkspaceGrowthHandling,
        Self::ResponseTimeOptimization,
        Self::AvailabilityManagement,
    ];

    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullStackIntegration => "FULL_STACK_INTEGRATION",
            Self::ArchitecturalConsistency => "ARCHITECTURAL_CONSISTENCY",
            Self::SecurityCoordination => "SECURITY_COORDINATION",
            Self::PerformanceOptimization => "PERFORMANCE_OPTIMIZATION",
            Self::ApiContractManagement => "API_CONTRACT_MANAGEMENT",
            Self::DataIntegration => "DATA_INTEGRATION",
            Self::FrontendBackendBridge => "FRONTEND_BACKEND_BRIDGE",
            Self::DevopsCoordination => "DEVOPS_COORDINATION",
            Self::ObservabilityUnification => "OBSERVABILITY_UNIFICATION",
            Self::TestingCoordination => "TESTING_COORDINATION",
            Self::DisasterRecovery => "DISASTER_RECOVERY",
            Self::DataGovernance => "DATA_GOVERNANCE",
            Self::DocumentationCoordination => "DOCUMENTATION_COORDINATION",
            Self::WorkflowCoordination => "WORKFLOW_COORDINATION",
            Self::DeploymentCoordination => "DEPLOYMENT_COORDINATION",
            Self::MonitoringIntegration => "MONITORING_INTEGRATION",
            Self::ComplianceEnforcement => "COMPLIANCE_ENFORCEMENT",
            Self::ChangeCoordination => "CHANGE_COORDINATION",
            Self::ConcurrentUserSupport => "CONCURRENT_USER_SUPPORT",
            Self::WorkspaceGrowthHandling => "WORKSPACE_GROWTH_HANDLING",
            Self::ResponseTimeOptimization => "RESPONSE_TIME_OPTIMIZATION",
            Self::AvailabilityManagement => "AVAILABILITY_MANAGEMENT",
        }
    }
}

impl fmt::Display for AgentCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentCapability {
    type Error = ParseAgentCapabilityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|capability| capability.as_str() == normalized)
            .ok_or_else(|| ParseAgentCapabilityError(value.to_owned()))
    }
}
