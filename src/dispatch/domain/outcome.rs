//! Results of executed routing decisions.

use std::time::Duration;

use super::DispatchError;
use crate::agent_registry::domain::{AgentId, AgentResponse, RequestId};
use crate::discovery::domain::RoutingType;

/// A response from one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    agent: AgentId,
    response: AgentResponse,
    latency: Duration,
}

impl AgentReply {
    /// Creates a reply.
    #[must_use]
    pub const fn new(agent: AgentId, response: AgentResponse, latency: Duration) -> Self {
        Self {
            agent,
            response,
            latency,
        }
    }

    /// Returns the agent that answered.
    #[must_use]
    pub const fn agent(&self) -> &AgentId {
        &self.agent
    }

    /// Returns the response.
    #[must_use]
    pub const fn response(&self) -> &AgentResponse {
        &self.response
    }

    /// Returns how long the agent took.
    #[must_use]
    pub const fn latency(&self) -> Duration {
        self.latency
    }
}

/// Replies gathered for one request, plus the failures tolerated on the
/// way.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    request_id: RequestId,
    routing_type: RoutingType,
    replies: Vec<AgentReply>,
    failures: Vec<DispatchError>,
}

impl DispatchOutcome {
    /// Creates an outcome. `replies` must not be empty.
    #[must_use]
    pub const fn new(
        request_id: RequestId,
        routing_type: RoutingType,
        replies: Vec<AgentReply>,
        failures: Vec<DispatchError>,
    ) -> Self {
        Self {
            request_id,
            routing_type,
            replies,
            failures,
        }
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns how the request was routed.
    #[must_use]
    pub const fn routing_type(&self) -> RoutingType {
        self.routing_type
    }

    /// Returns the first reply: the primary's, or the fallback that
    /// answered in its place.
    #[must_use]
    pub fn primary_reply(&self) -> Option<&AgentReply> {
        self.replies.first()
    }

    /// Returns every reply in routing order.
    #[must_use]
    pub fn replies(&self) -> &[AgentReply] {
        &self.replies
    }

    /// Returns the failures of agents whose work was not needed or was
    /// covered by others.
    #[must_use]
    pub fn failures(&self) -> &[DispatchError] {
        &self.failures
    }

    /// Returns the agents that answered, in routing order.
    pub fn handled_by(&self) -> impl Iterator<Item = &AgentId> {
        self.replies.iter().map(AgentReply::agent)
    }
}
