//! Per-capability discovery counters.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::agent_registry::domain::AgentCapability;

/// Running discovery totals for one capability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryMetrics {
    total: u64,
    successful: u64,
    total_time: Duration,
    candidates_found: u64,
}

impl DiscoveryMetrics {
    /// Records one discovery that took `elapsed` and ranked `candidates`.
    pub fn record(&mut self, elapsed: Duration, success: bool, candidates: usize) {
        self.total = self.total.saturating_add(1);
        if success {
            self.successful = self.successful.saturating_add(1);
        }
        self.total_time = self.total_time.saturating_add(elapsed);
        self.candidates_found = self
            .candidates_found
            .saturating_add(u64::try_from(candidates).unwrap_or(u64::MAX));
    }

    /// Returns the number of discoveries recorded.
    #[must_use]
    pub const fn total_discoveries(&self) -> u64 {
        self.total
    }

    /// Returns the number of discoveries that produced a route.
    #[must_use]
    pub const fn successful_discoveries(&self) -> u64 {
        self.successful
    }

    /// Returns the time spent across every discovery.
    #[must_use]
    pub const fn total_discovery_time(&self) -> Duration {
        self.total_time
    }

    /// Returns the sum of ranked candidates across every discovery.
    #[must_use]
    pub const fn total_candidates_found(&self) -> u64 {
        self.candidates_found
    }

    /// Returns the share of routed discoveries in permille, zero when none
    /// were recorded.
    #[must_use]
    pub fn success_permille(&self) -> u32 {
        self.successful
            .checked_mul(1_000)
            .and_then(|scaled| scaled.checked_div(self.total))
            .and_then(|ratio| u32::try_from(ratio).ok())
            .unwrap_or(0)
    }

    /// Returns the mean discovery time.
    #[must_use]
    pub fn average_discovery_time(&self) -> Duration {
        self.total_time
            .as_nanos()
            .checked_div(u128::from(self.total))
            .map_or(Duration::ZERO, |nanos| {
                Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
            })
    }

    /// Returns the mean number of ranked candidates, rounded down.
    #[must_use]
    pub fn average_candidates_found(&self) -> u64 {
        self.candidates_found.checked_div(self.total).unwrap_or(0)
    }

    const fn merged(self, other: &Self) -> Self {
        Self {
            total: self.total.saturating_add(other.total),
            successful: self.successful.saturating_add(other.successful),
            total_time: self.total_time.saturating_add(other.total_time),
            candidates_found: self.candidates_found.saturating_add(other.candidates_found),
        }
    }
}

/// Snapshot of discovery counters across every capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStatistics {
    by_capability: BTreeMap<AgentCapability, DiscoveryMetrics>,
    overall: DiscoveryMetrics,
}

impl DiscoveryStatistics {
    /// Builds a snapshot and its overall totals from per-capability
    /// counters.
    #[must_use]
    pub fn new(by_capability: BTreeMap<AgentCapability, DiscoveryMetrics>) -> Self {
        let overall = by_capability
            .values()
            .fold(DiscoveryMetrics::default(), |total, metrics| {
                total.merged(metrics)
            });
        Self {
            by_capability,
            overall,
        }
    }

    /// Returns the counters of one capability, if it was ever discovered.
    #[must_use]
    pub fn for_capability(&self, capability: AgentCapability) -> Option<&DiscoveryMetrics> {
        self.by_capability.get(&capability)
    }

    /// Returns the counters keyed by capability.
    #[must_use]
    pub const fn by_capability(&self) -> &BTreeMap<AgentCapability, DiscoveryMetrics> {
        &self.by_capability
    }

    /// Returns the totals across every capability.
    #[must_use]
    pub const fn overall(&self) -> &DiscoveryMetrics {
        &self.overall
    }
}
