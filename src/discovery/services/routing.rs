//! Deterministic routing strategy selection.

use crate::agent_registry::domain::AgentRequest;
use crate::discovery::domain::{RoutingDecision, RoutingPolicy, ScoredAgent};
use std::cmp::Reverse;
use std::sync::Arc;

/// Chooses how a request is executed from its ranked candidates.
///
/// Rules are checked in order and the first match wins:
///
/// 1. no candidates: no route;
/// 2. urgent priority: the top agent alone;
/// 3. cross-project with a close runner-up: coordination;
/// 4. complex with alternatives: primary with fallbacks;
/// 5. near-equal leaders: the least loaded of them;
/// 6. otherwise the top agent alone.
#[derive(Debug, Clone, Default)]
pub struct RoutingEngine {
    policy: RoutingPolicy,
}

impl RoutingEngine {
    /// Creates an engine with `policy`.
    #[must_use]
    pub const fn new(policy: RoutingPolicy) -> Self {
        Self { policy }
    }

    /// Returns the routing policy.
    #[must_use]
    pub const fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    /// Selects a routing decision; `ranked` must be ordered best first.
    #[must_use]
    pub fn select(&self, ranked: &[ScoredAgent], request: &AgentRequest) -> RoutingDecision {
        let Some(top) = ranked.first() else {
            return RoutingDecision::none("no candidate agents");
        };

        if request.priority() >= self.policy.urgent_priority {
            return RoutingDecision::single(
                Arc::clone(top.agent()),
                top.score(),
                format!(
                    "priority {} is urgent; routed to top agent {}",
                    request.priority(),
                    top.id()
                ),
            );
        }

        if let Some(decision) = self.coordination(ranked, top, request) {
            return decision;
        }

        if ranked.len() >= 2 && self.is_complex(request) {
            let fallbacks: Vec<_> = ranked
                .iter()
                .skip(1)
                .take(self.policy.max_fallbacks)
                .map(|candidate| Arc::clone(candidate.agent()))
                .collect();
            let reasoning = format!(
                "complex request; {} leads with {} fallback(s)",
                top.id(),
                fallbacks.len()
            );
            return RoutingDecision::primary_with_fallback(
                Arc::clone(top.agent()),
                fallbacks,
                top.score(),
                reasoning,
            );
        }

        if let Some(decision) = self.load_balance(ranked, top) {
            return decision;
        }

        RoutingDecision::single(
            Arc::clone(top.agent()),
            top.score(),
            format!("top agent {} scored {}", top.id(), top.score()),
        )
    }

    fn coordination(
        &self,
        ranked: &[ScoredAgent],
        top: &ScoredAgent,
        request: &AgentRequest,
    ) -> Option<RoutingDecision> {
        if !request.is_cross_project() {
            return None;
        }
        let runner_up = ranked.get(1)?;
        if runner_up.score() < top.score().saturating_sub(self.policy.coordination_gap) {
            return None;
        }

        let floor = top.score().saturating_sub(self.policy.coordination_window);
        let coordinators: Vec<_> = ranked
            .iter()
            .skip(1)
            .take(self.policy.max_coordinating.saturating_sub(1))
            .take_while(|candidate| candidate.score() >= floor)
            .map(|candidate| Arc::clone(candidate.agent()))
            .collect();
        if coordinators.is_empty() {
            return None;
        }
        let reasoning = format!(
            "cross-project request; {} coordinates with {} agent(s) within {} points",
            top.id(),
            coordinators.len(),
            self.policy.coordination_window
        );
        Some(RoutingDecision::multi_coordination(
            Arc::clone(top.agent()),
            coordinators,
            top.score(),
            reasoning,
        ))
    }

    fn load_balance(&self, ranked: &[ScoredAgent], top: &ScoredAgent) -> Option<RoutingDecision> {
        let floor = top.score().saturating_sub(self.policy.load_balance_window);
        let peers = ranked
            .iter()
            .take_while(|candidate| candidate.score() >= floor)
            .count();
        if peers < 2 {
            return None;
        }

        let chosen = ranked
            .iter()
            .take(peers)
            .enumerate()
            .min_by_key(|(rank, candidate)| {
                (candidate.load_factor(), Reverse(candidate.score()), *rank)
            })
            .map(|(_, candidate)| candidate)?;
        Some(RoutingDecision::load_balanced(
            Arc::clone(chosen.agent()),
            chosen.score(),
            format!(
                "{peers} agents within {} points; {} carries the least load",
                self.policy.load_balance_window,
                chosen.id()
            ),
        ))
    }

    fn is_complex(&self, request: &AgentRequest) -> bool {
        request.is_cross_project() || self.policy.is_complex(request.description())
    }
}
