//! Unit tests for routing strategy selection.

use crate::agent_registry::domain::AgentStatus;
use crate::discovery::{
    domain::{RoutingPolicy, RoutingType},
    services::RoutingEngine,
};
use rstest::{fixture, rstest};

use super::fixtures::{cross_project_request, healthy, id, request, scored};

#[fixture]
fn engine() -> RoutingEngine {
    RoutingEngine::default()
}

#[rstest]
fn no_candidates_route_nowhere(engine: RoutingEngine) {
    let decision = engine.select(&[], &request("check tokens"));
    assert_eq!(decision.routing_type(), RoutingType::None);
    assert!(decision.primary().is_none());
    assert_eq!(decision.confidence(), 0);
}

#[rstest]
fn urgent_request_goes_to_top_agent(engine: RoutingEngine) {
    let ranked = [healthy("unified-security", 95), healthy("junior-security", 40)];
    let decision = engine.select(&ranked, &request("rotate keys").with_priority(9));

    assert_eq!(decision.routing_type(), RoutingType::Single);
    assert_eq!(decision.agent_ids(), [id("unified-security")]);
    assert_eq!(decision.confidence(), 95);
}

#[rstest]
fn urgency_beats_coordination(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90), healthy("beta", 88)];
    let decision = engine.select(&ranked, &cross_project_request("sync").with_priority(8));
    assert_eq!(decision.routing_type(), RoutingType::Single);
}

#[rstest]
fn close_cross_project_candidates_coordinate(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90), healthy("beta", 88)];
    let decision = engine.select(&ranked, &cross_project_request("sync orders"));

    assert_eq!(decision.routing_type(), RoutingType::MultiCoordination);
    assert_eq!(decision.agent_ids(), [id("alpha"), id("beta")]);
    assert_eq!(decision.confidence(), 90);
}

#[rstest]
fn coordination_is_capped_and_windowed(engine: RoutingEngine) {
    let ranked = [
        healthy("alpha", 90),
        healthy("beta", 85),
        healthy("gamma", 80),
        healthy("delta", 78),
    ];
    let decision = engine.select(&ranked, &cross_project_request("sync"));
    assert_eq!(decision.routing_type(), RoutingType::MultiCoordination);
    assert_eq!(
        decision.agent_ids(),
        [id("alpha"), id("beta"), id("gamma")]
    );

    let spread = [healthy("alpha", 90), healthy("beta", 82), healthy("gamma", 70)];
    let narrowed = engine.select(&spread, &cross_project_request("sync"));
    assert_eq!(narrowed.agent_ids(), [id("alpha"), id("beta")]);
}

#[rstest]
fn distant_cross_project_runner_up_falls_back(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90), healthy("beta", 70), healthy("gamma", 60)];
    let decision = engine.select(&ranked, &cross_project_request("sync"));

    assert_eq!(decision.routing_type(), RoutingType::PrimaryWithFallback);
    assert_eq!(
        decision.agent_ids(),
        [id("alpha"), id("beta"), id("gamma")]
    );
}

#[rstest]
#[case("plan the schema MIGRATION")]
#[case("system integration review")]
#[case("architecture sign-off")]
fn complex_requests_get_fallbacks(engine: RoutingEngine, #[case] description: &str) {
    let ranked = [
        healthy("alpha", 90),
        healthy("beta", 70),
        healthy("gamma", 60),
        healthy("delta", 50),
    ];
    let decision = engine.select(&ranked, &request(description));

    assert_eq!(decision.routing_type(), RoutingType::PrimaryWithFallback);
    assert_eq!(
        decision.agent_ids(),
        [id("alpha"), id("beta"), id("gamma")]
    );
}

#[rstest]
fn complex_request_with_one_candidate_is_single(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90)];
    let decision = engine.select(&ranked, &request("database migration"));
    assert_eq!(decision.routing_type(), RoutingType::Single);
}

#[rstest]
fn near_equal_leaders_share_load(engine: RoutingEngine) {
    let ranked = [
        scored("alpha", 90, AgentStatus::degraded("busy")),
        healthy("beta", 87),
        healthy("gamma", 86),
        healthy("delta", 70),
    ];
    let decision = engine.select(&ranked, &request("check tokens"));

    assert_eq!(decision.routing_type(), RoutingType::LoadBalanced);
    assert_eq!(decision.agent_ids(), [id("beta")]);
    assert_eq!(decision.confidence(), 87);
}

#[rstest]
fn equal_load_prefers_rank(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90), healthy("beta", 90)];
    let decision = engine.select(&ranked, &request("check tokens"));
    assert_eq!(decision.routing_type(), RoutingType::LoadBalanced);
    assert_eq!(decision.agent_ids(), [id("alpha")]);
}

#[rstest]
fn load_balancing_ignores_lighter_agents_outside_the_window(engine: RoutingEngine) {
    let ranked = [
        scored("alpha", 90, AgentStatus::degraded("busy")),
        scored("beta", 88, AgentStatus::degraded("busy")),
        healthy("gamma", 60),
    ];
    let decision = engine.select(&ranked, &request("check tokens"));
    assert_eq!(decision.routing_type(), RoutingType::LoadBalanced);
    assert_eq!(decision.agent_ids(), [id("alpha")]);
}

#[rstest]
fn clear_winner_is_single(engine: RoutingEngine) {
    let ranked = [healthy("alpha", 90), healthy("beta", 60)];
    let decision = engine.select(&ranked, &request("check tokens"));
    assert_eq!(decision.routing_type(), RoutingType::Single);
    assert_eq!(decision.agent_ids(), [id("alpha")]);
}

#[rstest]
fn policy_thresholds_are_configurable() {
    let engine = RoutingEngine::new(RoutingPolicy {
        urgent_priority: 10,
        load_balance_window: 0,
        ..RoutingPolicy::default()
    });
    let ranked = [healthy("alpha", 90), healthy("beta", 87)];
    let decision = engine.select(&ranked, &request("check tokens").with_priority(9));
    assert_eq!(decision.routing_type(), RoutingType::Single);

    let coordinated = RoutingEngine::new(RoutingPolicy::single_agent())
        .select(&ranked, &cross_project_request("sync"));
    assert_eq!(coordinated.routing_type(), RoutingType::PrimaryWithFallback);
}
