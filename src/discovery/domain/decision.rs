//! Routing decisions produced for discovered candidates.

use crate::agent_registry::{domain::AgentId, ports::AgentHandle};
use std::fmt;

/// Execution strategy chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingType {
    /// One agent handles the request.
    Single,
    /// One agent handles the request; the others step in if it fails.
    PrimaryWithFallback,
    /// Several agents handle the request together.
    MultiCoordination,
    /// The least loaded of several equivalent agents handles the request.
    LoadBalanced,
    /// No agent can handle the request.
    None,
}

impl RoutingType {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::PrimaryWithFallback => "primary_with_fallback",
            Self::MultiCoordination => "multi_coordination",
            Self::LoadBalanced => "load_balanced",
            Self::None => "none",
        }
    }
}

impl fmt::Display for RoutingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The agents chosen for a request and how they cooperate.
///
/// A decision has a primary agent unless its type is [`RoutingType::None`];
/// the constructors are the only way to build one.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    routing_type: RoutingType,
    primary: Option<AgentHandle>,
    additional: Vec<AgentHandle>,
    confidence: u8,
    reasoning: String,
}

impl RoutingDecision {
    /// Creates a decision that routes nowhere.
    #[must_use]
    pub fn none(reasoning: impl Into<String>) -> Self {
        Self {
            routing_type: RoutingType::None,
            primary: None,
            additional: Vec::new(),
            confidence: 0,
            reasoning: reasoning.into(),
        }
    }

    /// Creates a single-agent decision.
    #[must_use]
    pub fn single(primary: AgentHandle, confidence: u8, reasoning: impl Into<String>) -> Self {
        Self::routed(RoutingType::Single, primary, Vec::new(), confidence, reasoning)
    }

    /// Creates a decision with fallbacks tried in order.
    #[must_use]
    pub fn primary_with_fallback(
        primary: AgentHandle,
        fallbacks: Vec<AgentHandle>,
        confidence: u8,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::routed(
            RoutingType::PrimaryWithFallback,
            primary,
            fallbacks,
            confidence,
            reasoning,
        )
    }

    /// Creates a decision where `primary` leads `coordinators`.
    #[must_use]
    pub fn multi_coordination(
        primary: AgentHandle,
        coordinators: Vec<AgentHandle>,
        confidence: u8,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::routed(
            RoutingType::MultiCoordination,
            primary,
            coordinators,
            confidence,
            reasoning,
        )
    }

    /// Creates a load-balanced decision.
    #[must_use]
    pub fn load_balanced(primary: AgentHandle, confidence: u8, reasoning: impl Into<String>) -> Self {
        Self::routed(
            RoutingType::LoadBalanced,
            primary,
            Vec::new(),
            confidence,
            reasoning,
        )
    }

    fn routed(
        routing_type: RoutingType,
        primary: AgentHandle,
        additional: Vec<AgentHandle>,
        confidence: u8,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            routing_type,
            primary: Some(primary),
            additional,
            confidence: confidence.min(100),
            reasoning: reasoning.into(),
        }
    }

    /// Returns the routing strategy.
    #[must_use]
    pub const fn routing_type(&self) -> RoutingType {
        self.routing_type
    }

    /// Returns the primary agent; `None` only for [`RoutingType::None`].
    #[must_use]
    pub const fn primary(&self) -> Option<&AgentHandle> {
        self.primary.as_ref()
    }

    /// Returns the fallbacks or coordinators behind the primary.
    #[must_use]
    pub fn additional(&self) -> &[AgentHandle] {
        &self.additional
    }

    /// Returns the primary followed by the additional agents.
    pub fn agents(&self) -> impl Iterator<Item = &AgentHandle> {
        self.primary.iter().chain(self.additional.iter())
    }

    /// Returns the identifiers of [`Self::agents`].
    #[must_use]
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents().map(|agent| agent.id().clone()).collect()
    }

    /// Returns the decision confidence in `0..=100`.
    #[must_use]
    pub const fn confidence(&self) -> u8 {
        self.confidence
    }

    /// Returns a human-readable explanation.
    #[must_use]
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}
