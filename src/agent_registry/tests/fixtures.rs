//! Shared builders for registry tests.

use std::sync::Arc;

use crate::agent_registry::{
    adapters::memory::StaticAgent,
    domain::{AgentCapability, AgentId, AgentMetadata, AgentType, AgentVersion},
    ports::AgentHandle,
    services::CapabilityRegistry,
};
use mockable::DefaultClock;

pub(super) type TestRegistry = CapabilityRegistry<DefaultClock>;

pub(super) fn id(value: &str) -> AgentId {
    AgentId::new(value).expect("test agent id should be valid")
}

pub(super) fn version(value: &str) -> AgentVersion {
    AgentVersion::new(value).expect("test version should be valid")
}

pub(super) fn registry() -> TestRegistry {
    CapabilityRegistry::new(Arc::new(DefaultClock))
}

/// Builds a technology-bridge agent offering `capabilities` at score 80.
pub(super) fn agent(
    name: &str,
    capabilities: &[AgentCapability],
    dependencies: &[&str],
) -> Arc<StaticAgent> {
    let base = capabilities.iter().fold(
        StaticAgent::new(id(name), AgentType::TechnologyBridge),
        |built, capability| built.with_capability(*capability, 80),
    );
    Arc::new(
        dependencies
            .iter()
            .fold(base, |built, dependency| built.with_dependency(id(dependency))),
    )
}

pub(super) fn metadata_for(agent: &StaticAgent, agent_version: &str) -> AgentMetadata {
    AgentMetadata::for_agent(agent, version(agent_version))
}

pub(super) fn register(
    registry: &TestRegistry,
    name: &str,
    capabilities: &[AgentCapability],
    dependencies: &[&str],
) -> Arc<StaticAgent> {
    let built = agent(name, capabilities, dependencies);
    let metadata = metadata_for(&built, "1.0.0");
    let handle: AgentHandle = built.clone();
    registry
        .register(handle, metadata)
        .expect("registration should succeed");
    built
}
