//! Capability discovery with contextual filtering and ranking.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use mockable::Clock;
use tracing::{debug, info, warn};

use super::{PerformanceMonitor, RoutingEngine, scoring};
use crate::agent_registry::{
    domain::{AgentCapability, AgentMetadata, AgentRequest, RegisteredAgent},
    services::CapabilityRegistry,
};
use crate::discovery::domain::{
    AgentMetrics, DiscoveryConfig, DiscoveryFailure, DiscoveryMetrics, DiscoveryResult,
    DiscoveryStatistics, RoutingPolicy, ScoredAgent,
};

/// Finds, filters and ranks agents for a request, then routes it.
///
/// Discovery reads a registry snapshot and never mutates it. A failure to
/// find a suitable agent is reported in the [`DiscoveryResult`], never as
/// an error. Every discovery, routed or not, is counted per capability.
#[derive(Debug)]
pub struct DiscoveryService<C>
where
    C: Clock + Send + Sync,
{
    registry: Arc<CapabilityRegistry<C>>,
    monitor: Arc<PerformanceMonitor>,
    engine: RoutingEngine,
    config: DiscoveryConfig,
    statistics: DashMap<AgentCapability, DiscoveryMetrics>,
    clock: Arc<C>,
}

impl<C> DiscoveryService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a service with default filters and routing policy.
    #[must_use]
    pub fn new(
        registry: Arc<CapabilityRegistry<C>>,
        monitor: Arc<PerformanceMonitor>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            registry,
            monitor,
            engine: RoutingEngine::default(),
            config: DiscoveryConfig::default(),
            statistics: DashMap::new(),
            clock,
        }
    }

    /// Replaces the routing policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RoutingPolicy) -> Self {
        self.engine = RoutingEngine::new(policy);
        self
    }

    /// Replaces the candidate filters.
    #[must_use]
    pub fn with_config(mut self, config: DiscoveryConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the routing engine.
    #[must_use]
    pub const fn engine(&self) -> &RoutingEngine {
        &self.engine
    }

    /// Returns the performance monitor feeding the health filter.
    #[must_use]
    pub const fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }

    /// Discovers agents for `request` and decides how to route it.
    #[must_use]
    pub fn discover(&self, request: &AgentRequest) -> DiscoveryResult {
        let started = self.clock.utc();
        let result = match self.rank(request) {
            Ok(ranked) => {
                let decision = self.engine.select(&ranked, request);
                info!(
                    request = %request.id(),
                    capability = %request.capability(),
                    routing = %decision.routing_type(),
                    confidence = decision.confidence(),
                    candidates = ranked.len(),
                    "request routed"
                );
                DiscoveryResult::routed(request.id(), decision, ranked, started)
            }
            Err(failure) => {
                info!(
                    request = %request.id(),
                    capability = %request.capability(),
                    reason = %failure,
                    "no route for request"
                );
                DiscoveryResult::failed(request.id(), failure, started)
            }
        };
        let elapsed = (self.clock.utc() - started).to_std().unwrap_or_default();
        self.record_discovery(request.capability(), elapsed, &result);
        result
    }

    /// Returns discovery counters per capability and overall.
    #[must_use]
    pub fn statistics(&self) -> DiscoveryStatistics {
        let by_capability: BTreeMap<_, _> = self
            .statistics
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        DiscoveryStatistics::new(by_capability)
    }

    /// Clears every discovery counter.
    pub fn reset_statistics(&self) {
        self.statistics.clear();
    }

    fn record_discovery(
        &self,
        capability: AgentCapability,
        elapsed: Duration,
        result: &DiscoveryResult,
    ) {
        self.statistics
            .entry(capability)
            .or_default()
            .record(elapsed, result.is_success(), result.candidates().len());
        debug!(capability = %capability, elapsed = ?elapsed, "discovery recorded");
    }

    /// Returns the suitable candidates for `request`, best first.
    ///
    /// Ties are ordered by ascending agent identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscoveryFailure`] when the registry is unavailable, no
    /// healthy agent offers the capability, or every candidate is filtered
    /// out.
    pub fn rank(&self, request: &AgentRequest) -> Result<Vec<ScoredAgent>, DiscoveryFailure> {
        let capability = request.capability();
        let candidates = self
            .registry
            .healthy_with_capability(capability)
            .map_err(|err| {
                warn!(capability = %capability, error = %err, "registry unavailable for discovery");
                DiscoveryFailure::RegistryUnavailable(err.to_string())
            })?;
        if candidates.is_empty() {
            return Err(DiscoveryFailure::NoAgentsFound(capability));
        }

        let required_technologies = self.config.technologies_in(request.description());
        let mut ranked: Vec<ScoredAgent> = candidates
            .into_iter()
            .filter_map(|entry| {
                let metrics = self.monitor.snapshot(entry.id());
                let suitable = matches_context(entry.metadata(), request)
                    && entry.metadata().covers_technologies(&required_technologies)
                    && self.meets_performance(&metrics);
                if !suitable {
                    debug!(agent = %entry.id(), capability = %capability, "candidate filtered out");
                    return None;
                }
                Some(score_candidate(entry, request, &metrics))
            })
            .collect();
        if ranked.is_empty() {
            return Err(DiscoveryFailure::NoSuitableAgents(capability));
        }

        ranked.sort_by(|left, right| {
            right
                .score()
                .cmp(&left.score())
                .then_with(|| left.id().cmp(right.id()))
        });
        Ok(ranked)
    }

    fn meets_performance(&self, metrics: &AgentMetrics) -> bool {
        metrics.success_permille() >= self.config.min_success_permille
            && metrics.average_latency_ms() <= self.config.max_average_latency_ms
    }
}

fn matches_context(metadata: &AgentMetadata, request: &AgentRequest) -> bool {
    if metadata.is_workspace_level() {
        return true;
    }
    if request.is_cross_project() {
        return metadata.supports_cross_project();
    }
    request
        .involved_projects()
        .all(|project| metadata.supports_project(project))
}

fn score_candidate(
    entry: RegisteredAgent,
    request: &AgentRequest,
    metrics: &AgentMetrics,
) -> ScoredAgent {
    let score = scoring::score(&entry, request, metrics);
    let status = entry.agent().status();
    ScoredAgent::new(entry, status, score)
}
