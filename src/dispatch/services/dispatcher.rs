//! Executes routing decisions against the chosen agents.

use std::sync::Arc;

use futures::future::join_all;
use mockable::Clock;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};

use crate::agent_registry::{domain::AgentRequest, ports::AgentHandle};
use crate::discovery::{
    domain::{DiscoveryFailure, RoutingDecision, RoutingType},
    services::{DiscoveryService, PerformanceMonitor},
};
use crate::dispatch::domain::{AgentReply, DispatchConfig, DispatchError, DispatchOutcome};

/// Runs `discover → execute → record` for each request.
///
/// Every attempt is bounded by [`DispatchConfig::request_timeout`] and its
/// latency and success are recorded in the discovery service's
/// [`PerformanceMonitor`]. Registry state is never touched.
#[derive(Debug)]
pub struct RequestDispatcher<C>
where
    C: Clock + Send + Sync,
{
    discovery: DiscoveryService<C>,
    config: DispatchConfig,
}

impl<C> RequestDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher routing through `discovery`.
    #[must_use]
    pub const fn new(discovery: DiscoveryService<C>, config: DispatchConfig) -> Self {
        Self { discovery, config }
    }

    /// Returns the discovery service.
    #[must_use]
    pub const fn discovery(&self) -> &DiscoveryService<C> {
        &self.discovery
    }

    /// Returns the dispatcher settings.
    #[must_use]
    pub const fn config(&self) -> DispatchConfig {
        self.config
    }

    fn monitor(&self) -> &Arc<PerformanceMonitor> {
        self.discovery.monitor()
    }

    /// Routes `request` and executes the decision.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoRoute`] when discovery fails, otherwise as
    /// [`Self::execute`].
    pub async fn dispatch(&self, request: &AgentRequest) -> Result<DispatchOutcome, DispatchError> {
        let discovery = self.discovery.discover(request);
        if let Some(failure) = discovery.failure() {
            warn!(request = %request.id(), reason = %failure, "request not dispatched");
            return Err(DispatchError::NoRoute(failure.clone()));
        }
        self.execute(discovery.decision(), request).await
    }

    /// Executes `decision` for `request`.
    ///
    /// Single and load-balanced decisions call the primary. Fallback
    /// decisions call the primary, then each fallback in turn until one
    /// answers. Coordination decisions call every agent concurrently and
    /// succeed when at least one answers.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::NoRoute`] for a decision without agents,
    /// the agent's own failure for single-agent decisions, and
    /// [`DispatchError::AllAgentsFailed`] when every agent of a fallback or
    /// coordination decision fails.
    pub async fn execute(
        &self,
        decision: &RoutingDecision,
        request: &AgentRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(primary) = decision.primary() else {
            return Err(DispatchError::NoRoute(DiscoveryFailure::NoAgentsFound(
                request.capability(),
            )));
        };
        let routing_type = decision.routing_type();
        let outcome = match routing_type {
            RoutingType::Single | RoutingType::LoadBalanced | RoutingType::None => {
                let reply = self.attempt(primary, request).await?;
                DispatchOutcome::new(request.id(), routing_type, vec![reply], Vec::new())
            }
            RoutingType::PrimaryWithFallback => self.with_fallbacks(decision, request).await?,
            RoutingType::MultiCoordination => self.coordinate(decision, request).await?,
        };
        info!(
            request = %request.id(),
            routing = %routing_type,
            replies = outcome.replies().len(),
            failures = outcome.failures().len(),
            "request dispatched"
        );
        Ok(outcome)
    }

    async fn with_fallbacks(
        &self,
        decision: &RoutingDecision,
        request: &AgentRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let mut failures = Vec::new();
        for agent in decision.agents() {
            match self.attempt(agent, request).await {
                Ok(reply) => {
                    return Ok(DispatchOutcome::new(
                        request.id(),
                        decision.routing_type(),
                        vec![reply],
                        failures,
                    ));
                }
                Err(err) => {
                    debug!(agent = %agent.id(), error = %err, "falling back");
                    failures.push(err);
                }
            }
        }
        Err(DispatchError::AllAgentsFailed { failures })
    }

    async fn coordinate(
        &self,
        decision: &RoutingDecision,
        request: &AgentRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        let attempts = join_all(decision.agents().map(|agent| self.attempt(agent, request))).await;
        let mut replies = Vec::new();
        let mut failures = Vec::new();
        for attempt in attempts {
            match attempt {
                Ok(reply) => replies.push(reply),
                Err(err) => failures.push(err),
            }
        }
        if replies.is_empty() {
            return Err(DispatchError::AllAgentsFailed { failures });
        }
        Ok(DispatchOutcome::new(
            request.id(),
            decision.routing_type(),
            replies,
            failures,
        ))
    }

    async fn attempt(
        &self,
        agent: &AgentHandle,
        request: &AgentRequest,
    ) -> Result<AgentReply, DispatchError> {
        let limit = self.config.request_timeout();
        let started = Instant::now();
        let outcome = timeout(limit, agent.process(request)).await;
        let latency = started.elapsed();
        let id = agent.id().clone();

        match outcome {
            Ok(Ok(response)) => {
                self.monitor().record_success(&id, latency);
                debug!(agent = %id, latency = ?latency, "agent answered");
                Ok(AgentReply::new(id, response, latency))
            }
            Ok(Err(source)) => {
                self.monitor().record_failure(&id, latency);
                warn!(agent = %id, kind = %source.kind(), "agent failed");
                Err(DispatchError::AgentFailed { agent: id, source })
            }
            Err(_) => {
                self.monitor().record_failure(&id, latency);
                warn!(agent = %id, timeout = ?limit, "agent timed out");
                Err(DispatchError::Timeout {
                    agent: id,
                    after: limit,
                })
            }
        }
    }
}
