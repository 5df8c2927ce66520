//! Discovery outcomes.

use super::{RoutingDecision, ScoredAgent};
use crate::agent_registry::domain::{AgentCapability, RequestId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Candidates scoring at least this much add to the discovery quality.
const STRONG_CANDIDATE_SCORE: u8 = 70;

/// Why discovery produced no route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscoveryFailure {
    /// No healthy agent offers the capability.
    #[error("no healthy agent offers capability {0}")]
    NoAgentsFound(AgentCapability),

    /// Agents offer the capability but none passed the context, technology
    /// or health filters.
    #[error("no agent offering capability {0} suits the request context")]
    NoSuitableAgents(AgentCapability),

    /// The registry could not be read.
    #[error("agent registry unavailable: {0}")]
    RegistryUnavailable(String),
}

/// Ranked candidates and the routing decision for one request.
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    request_id: RequestId,
    decision: RoutingDecision,
    candidates: Vec<ScoredAgent>,
    failure: Option<DiscoveryFailure>,
    discovered_at: DateTime<Utc>,
}

impl DiscoveryResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn routed(
        request_id: RequestId,
        decision: RoutingDecision,
        candidates: Vec<ScoredAgent>,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            decision,
            candidates,
            failure: None,
            discovered_at,
        }
    }

    /// Creates a failed result with a [`RoutingDecision::none`] decision.
    #[must_use]
    pub fn failed(
        request_id: RequestId,
        failure: DiscoveryFailure,
        discovered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id,
            decision: RoutingDecision::none(failure.to_string()),
            candidates: Vec::new(),
            failure: Some(failure),
            discovered_at,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the routing decision.
    #[must_use]
    pub const fn decision(&self) -> &RoutingDecision {
        &self.decision
    }

    /// Consumes the result and returns the routing decision.
    #[must_use]
    pub fn into_decision(self) -> RoutingDecision {
        self.decision
    }

    /// Returns the candidates, best first.
    #[must_use]
    pub fn candidates(&self) -> &[ScoredAgent] {
        &self.candidates
    }

    /// Returns the failure, if discovery produced no route.
    #[must_use]
    pub const fn failure(&self) -> Option<&DiscoveryFailure> {
        self.failure.as_ref()
    }

    /// Returns whether discovery produced a route.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Returns when discovery ran.
    #[must_use]
    pub const fn discovered_at(&self) -> DateTime<Utc> {
        self.discovered_at
    }

    /// Scores how well discovery went, in `0..=100`.
    ///
    /// Failures score 0. Otherwise the score is 40 plus two fifths of the
    /// decision confidence, plus 5 for each strong candidate (up to 20) when
    /// there was a choice to make.
    #[must_use]
    pub fn quality_score(&self) -> u8 {
        if self.failure.is_some() {
            return 0;
        }
        let confidence = u32::from(self.decision.confidence())
            .saturating_mul(2)
            .checked_div(5)
            .unwrap_or_default();
        let variety = if self.candidates.len() > 1 {
            let strong = self
                .candidates
                .iter()
                .filter(|candidate| candidate.score() >= STRONG_CANDIDATE_SCORE)
                .count();
            u32::try_from(strong).unwrap_or(u32::MAX).saturating_mul(5).min(20)
        } else {
            0
        };
        let total = (40 + confidence + variety).min(100);
        u8::try_from(total).unwrap_or(100)
    }
}
