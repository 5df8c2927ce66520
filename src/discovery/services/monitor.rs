//! Concurrent store of rolling per-agent performance metrics.
//!
//! Written by the dispatcher after every agent call, read by discovery
//! when filtering and scoring candidates. Agents without samples report a
//! perfect record.

use crate::agent_registry::domain::AgentId;
use crate::discovery::domain::{AgentMetrics, MonitorConfig};
use dashmap::DashMap;
use std::time::Duration;
use tracing::debug;

/// Thread-safe map of rolling metrics keyed by agent.
#[derive(Debug)]
pub struct PerformanceMonitor {
    metrics: DashMap<AgentId, AgentMetrics>,
    window_size: usize,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl PerformanceMonitor {
    /// Creates an empty monitor.
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            metrics: DashMap::new(),
            window_size: config.window_size,
        }
    }

    /// Records a successful call.
    pub fn record_success(&self, agent: &AgentId, latency: Duration) {
        self.record(agent, latency, true);
    }

    /// Records a failed call.
    pub fn record_failure(&self, agent: &AgentId, latency: Duration) {
        self.record(agent, latency, false);
    }

    /// Returns a copy of the agent's metrics, empty when none were recorded.
    #[must_use]
    pub fn snapshot(&self, agent: &AgentId) -> AgentMetrics {
        self.metrics
            .get(agent)
            .map_or_else(|| AgentMetrics::new(self.window_size), |entry| entry.value().clone())
    }

    /// Drops every sample of an agent.
    pub fn reset(&self, agent: &AgentId) {
        self.metrics.remove(agent);
    }

    /// Number of agents with recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no samples were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn record(&self, agent: &AgentId, latency: Duration, success: bool) {
        let mut entry = self
            .metrics
            .entry(agent.clone())
            .or_insert_with(|| AgentMetrics::new(self.window_size));
        entry.record(latency, success);
        debug!(
            agent = %agent,
            success,
            latency_ms = latency.as_millis(),
            samples = entry.sample_count(),
            "performance sample recorded"
        );
    }
}
