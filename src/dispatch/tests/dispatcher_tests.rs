//! Unit tests for the request dispatcher.

use std::{sync::Arc, time::Duration};

use crate::agent_registry::{
    adapters::memory::StaticAgent,
    domain::{AgentCapability, AgentId, AgentMetadata, AgentRequest, AgentType, AgentVersion},
    ports::{AgentErrorKind, AgentHandle},
    services::CapabilityRegistry,
};
use crate::discovery::{
    domain::{DiscoveryFailure, RoutingDecision, RoutingType},
    services::{DiscoveryService, PerformanceMonitor},
};
use crate::dispatch::{
    domain::{DispatchConfig, DispatchError},
    services::RequestDispatcher,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

const SECURITY: AgentCapability = AgentCapability::SecurityCoordination;

fn id(value: &str) -> AgentId {
    AgentId::new(value).expect("test agent id should be valid")
}

fn request(description: &str) -> AgentRequest {
    AgentRequest::new("review", description, SECURITY, "positivity", &DefaultClock)
}

fn bridge(name: &str, rating: u8) -> StaticAgent {
    StaticAgent::new(id(name), AgentType::TechnologyBridge).with_capability(SECURITY, rating)
}

struct Desk {
    registry: Arc<CapabilityRegistry<DefaultClock>>,
    monitor: Arc<PerformanceMonitor>,
    dispatcher: RequestDispatcher<DefaultClock>,
}

impl Desk {
    fn with_config(config: DispatchConfig) -> Self {
        let clock = Arc::new(DefaultClock);
        let registry = Arc::new(CapabilityRegistry::new(Arc::clone(&clock)));
        let monitor = Arc::new(PerformanceMonitor::default());
        let discovery = DiscoveryService::new(Arc::clone(&registry), Arc::clone(&monitor), clock);
        Self {
            registry,
            monitor,
            dispatcher: RequestDispatcher::new(discovery, config),
        }
    }

    fn add(&self, agent: StaticAgent) -> Arc<StaticAgent> {
        let shared = Arc::new(agent);
        let version = AgentVersion::new("1.0.0").expect("test version should be valid");
        let metadata = AgentMetadata::for_agent(shared.as_ref(), version);
        self.registry
            .register(Arc::clone(&shared) as AgentHandle, metadata)
            .expect("registration should succeed");
        shared
    }
}

#[fixture]
fn desk() -> Desk {
    Desk::with_config(DispatchConfig::default())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn single_route_calls_the_primary_and_records_success(desk: Desk) {
    let solo = desk.add(bridge("solo", 90).with_guidance("rotate the signing keys"));

    let outcome = desk
        .dispatcher
        .dispatch(&request("check tokens"))
        .await
        .expect("dispatch should succeed");

    assert_eq!(outcome.routing_type(), RoutingType::Single);
    let reply = outcome.primary_reply().expect("primary should reply");
    assert_eq!(reply.agent(), &id("solo"));
    assert_eq!(reply.response().guidance(), "rotate the signing keys");
    assert!(outcome.failures().is_empty());
    assert_eq!(solo.process_calls(), 1);

    let metrics = desk.monitor.snapshot(&id("solo"));
    assert_eq!(metrics.sample_count(), 1);
    assert_eq!(metrics.success_permille(), 1_000);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unroutable_requests_are_reported(desk: Desk) {
    let err = desk
        .dispatcher
        .dispatch(&request("check tokens"))
        .await
        .expect_err("nothing can handle the request");
    assert_eq!(
        err,
        DispatchError::NoRoute(DiscoveryFailure::NoAgentsFound(SECURITY))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn agent_failures_feed_the_health_filter(desk: Desk) {
    desk.add(bridge("flaky", 90).failing(AgentErrorKind::ResourceExhaustion));

    let err = desk
        .dispatcher
        .dispatch(&request("check tokens"))
        .await
        .expect_err("the only agent fails");
    let DispatchError::AgentFailed { agent, source } = &err else {
        panic!("expected an agent failure, got {err:?}");
    };
    assert_eq!(agent, &id("flaky"));
    assert_eq!(source.kind(), AgentErrorKind::ResourceExhaustion);
    assert_eq!(err.agent(), Some(&id("flaky")));

    let retry = desk.dispatcher.dispatch(&request("check tokens")).await;
    assert_eq!(
        retry,
        Err(DispatchError::NoRoute(DiscoveryFailure::NoSuitableAgents(
            SECURITY
        )))
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_agents_time_out() {
    let desk = Desk::with_config(DispatchConfig {
        request_timeout_ms: 50,
    });
    desk.add(bridge("slow", 90).with_latency(Duration::from_millis(500)));

    let err = desk
        .dispatcher
        .dispatch(&request("check tokens"))
        .await
        .expect_err("the agent should time out");

    assert_eq!(
        err,
        DispatchError::Timeout {
            agent: id("slow"),
            after: Duration::from_millis(50),
        }
    );
    assert_eq!(desk.monitor.snapshot(&id("slow")).success_permille(), 0);
    assert_eq!(desk.registry.len(), Ok(1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fallbacks_cover_a_failing_primary(desk: Desk) {
    let alpha = desk.add(bridge("alpha", 100).failing(AgentErrorKind::Unavailable));
    let beta = desk.add(bridge("beta", 90));

    let outcome = desk
        .dispatcher
        .dispatch(&request("plan the schema migration"))
        .await
        .expect("the fallback should answer");

    assert_eq!(outcome.routing_type(), RoutingType::PrimaryWithFallback);
    assert_eq!(outcome.handled_by().cloned().collect::<Vec<_>>(), [id("beta")]);
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(
        outcome.failures().first().and_then(DispatchError::agent),
        Some(&id("alpha"))
    );
    assert_eq!((alpha.process_calls(), beta.process_calls()), (1, 1));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fallback_stops_at_the_first_answer(desk: Desk) {
    desk.add(bridge("alpha", 100));
    let beta = desk.add(bridge("beta", 90));

    let outcome = desk
        .dispatcher
        .dispatch(&request("plan the schema migration"))
        .await
        .expect("the primary should answer");

    assert_eq!(outcome.handled_by().cloned().collect::<Vec<_>>(), [id("alpha")]);
    assert_eq!(beta.process_calls(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_fallbacks_report_every_failure(desk: Desk) {
    desk.add(bridge("alpha", 100).failing(AgentErrorKind::Unavailable));
    desk.add(bridge("beta", 90).failing(AgentErrorKind::Timeout));

    let err = desk
        .dispatcher
        .dispatch(&request("plan the schema migration"))
        .await
        .expect_err("every agent fails");

    let DispatchError::AllAgentsFailed { failures } = err else {
        panic!("expected every agent to fail");
    };
    let agents: Vec<_> = failures.iter().filter_map(DispatchError::agent).collect();
    assert_eq!(agents, [&id("alpha"), &id("beta")]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn coordination_gathers_every_answer(desk: Desk) {
    desk.add(bridge("alpha", 100));
    desk.add(bridge("beta", 90));

    let outcome = desk
        .dispatcher
        .dispatch(&request("sync login flows").with_target_project("moqui_example"))
        .await
        .expect("coordination should succeed");

    assert_eq!(outcome.routing_type(), RoutingType::MultiCoordination);
    assert_eq!(
        outcome.handled_by().cloned().collect::<Vec<_>>(),
        [id("alpha"), id("beta")]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn coordination_tolerates_partial_failure(desk: Desk) {
    desk.add(bridge("alpha", 100).failing(AgentErrorKind::CoordinationFailure));
    desk.add(bridge("beta", 90));

    let outcome = desk
        .dispatcher
        .dispatch(&request("sync login flows").with_target_project("moqui_example"))
        .await
        .expect("one coordinator is enough");

    assert_eq!(outcome.handled_by().cloned().collect::<Vec<_>>(), [id("beta")]);
    assert_eq!(outcome.failures().len(), 1);
    assert_eq!(desk.monitor.snapshot(&id("alpha")).success_permille(), 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_decisions_are_not_executed(desk: Desk) {
    let err = desk
        .dispatcher
        .execute(&RoutingDecision::none("nothing to do"), &request("check"))
        .await
        .expect_err("an empty decision has no agent");
    assert_eq!(
        err,
        DispatchError::NoRoute(DiscoveryFailure::NoAgentsFound(SECURITY))
    );
}

#[rstest]
fn timeout_is_configured_in_milliseconds() {
    let config = DispatchConfig {
        request_timeout_ms: 1_500,
    };
    assert_eq!(config.request_timeout(), Duration::from_millis(1_500));
    assert_eq!(
        DispatchConfig::default().request_timeout(),
        Duration::from_secs(30)
    );
}
