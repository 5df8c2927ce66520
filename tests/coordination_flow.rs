//! End-to-end coordination: configure, register, start, route and stop.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use switchyard::{
    agent_registry::{
        adapters::memory::StaticAgent,
        domain::{AgentCapability, AgentId, AgentMetadata, AgentRequest, AgentType, AgentVersion},
        ports::AgentHandle,
        services::CapabilityRegistry,
    },
    config::CoordinationConfig,
    discovery::{
        domain::RoutingType,
        services::{DiscoveryService, PerformanceMonitor},
    },
    dispatch::services::RequestDispatcher,
    loader::{domain::LoadingState, services::DependencyLoader},
};

const CONFIG: &str = r#"{
    "routing": {"urgent_priority": 8},
    "dispatch": {"request_timeout_ms": 2000},
    "monitor": {"window_size": 10}
}"#;

fn id(value: &str) -> AgentId {
    AgentId::new(value).expect("test agent id should be valid")
}

struct Workspace {
    registry: Arc<CapabilityRegistry<DefaultClock>>,
    monitor: Arc<PerformanceMonitor>,
    loader: Arc<DependencyLoader<DefaultClock>>,
    dispatcher: RequestDispatcher<DefaultClock>,
}

impl Workspace {
    fn add(&self, agent: StaticAgent) -> Arc<StaticAgent> {
        let shared = Arc::new(agent);
        let version = AgentVersion::new("2.1.0").expect("test version should be valid");
        let metadata = AgentMetadata::for_agent(shared.as_ref(), version);
        self.registry
            .register(Arc::clone(&shared) as AgentHandle, metadata)
            .expect("registration should succeed");
        shared
    }
}

#[fixture]
fn workspace() -> Workspace {
    let config = CoordinationConfig::from_json_str(CONFIG).expect("config should parse");
    let clock = Arc::new(DefaultClock);
    let registry = Arc::new(CapabilityRegistry::new(Arc::clone(&clock)));
    let monitor = Arc::new(PerformanceMonitor::new(config.monitor));
    let discovery = DiscoveryService::new(Arc::clone(&registry), Arc::clone(&monitor), clock)
        .with_policy(config.routing)
        .with_config(config.discovery);
    Workspace {
        loader: Arc::new(DependencyLoader::new(Arc::clone(&registry))),
        dispatcher: RequestDispatcher::new(discovery, config.dispatch),
        registry,
        monitor,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn started_agents_answer_routed_requests(workspace: Workspace) {
    workspace.add(
        StaticAgent::new(id("unified-security"), AgentType::TechnologyBridge)
            .with_capability(AgentCapability::SecurityCoordination, 95)
            .with_guidance("rotate the signing keys"),
    );
    let deployer = workspace.add(
        StaticAgent::new(id("deployer"), AgentType::OperationalCoordination)
            .with_capability(AgentCapability::DeploymentCoordination, 80)
            .with_dependency(id("unified-security")),
    );

    let report = workspace
        .loader
        .load_all_with_dependencies(&[id("deployer")])
        .await
        .expect("start-up should succeed");
    assert_eq!(report.loading_order(), [id("unified-security"), id("deployer")]);

    let request = AgentRequest::new(
        "incident",
        "signing keys leaked",
        AgentCapability::SecurityCoordination,
        "positivity",
        &DefaultClock,
    )
    .with_priority(8);
    let outcome = workspace
        .dispatcher
        .dispatch(&request)
        .await
        .expect("dispatch should succeed");

    assert_eq!(outcome.routing_type(), RoutingType::Single);
    assert_eq!(outcome.request_id(), request.id());
    let reply = outcome.primary_reply().expect("primary should reply");
    assert_eq!(reply.agent(), &id("unified-security"));
    assert_eq!(reply.response().guidance(), "rotate the signing keys");
    assert_eq!(
        workspace.monitor.snapshot(&id("unified-security")).sample_count(),
        1
    );
    assert_eq!(deployer.process_calls(), 0);

    let stopped = workspace
        .loader
        .unload_all_with_dependencies(&[id("unified-security")])
        .expect("shut-down should succeed");
    assert_eq!(stopped.unloaded(), [id("deployer"), id("unified-security")]);
    assert_eq!(
        workspace.loader.state_of(&id("deployer")),
        Ok(LoadingState::NotLoaded)
    );
    assert_eq!(
        workspace.registry.statistics().expect("statistics").registered_agents,
        2
    );
}
