//! Outcomes of bulk load and unload operations.

use crate::agent_registry::domain::AgentId;
use std::collections::BTreeSet;

/// Outcome of [`load_all_with_dependencies`].
///
/// [`load_all_with_dependencies`]: crate::loader::services::DependencyLoader::load_all_with_dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingReport {
    requested: BTreeSet<AgentId>,
    loading_order: Vec<AgentId>,
}

impl LoadingReport {
    /// Creates a report for `requested` loaded in `loading_order`.
    #[must_use]
    pub const fn new(requested: BTreeSet<AgentId>, loading_order: Vec<AgentId>) -> Self {
        Self {
            requested,
            loading_order,
        }
    }

    /// Returns the identifiers the caller asked for.
    #[must_use]
    pub const fn requested(&self) -> &BTreeSet<AgentId> {
        &self.requested
    }

    /// Returns every loaded agent, dependencies first.
    #[must_use]
    pub fn loading_order(&self) -> &[AgentId] {
        &self.loading_order
    }

    /// Returns the agents loaded only because something requested needed
    /// them.
    pub fn implied(&self) -> impl Iterator<Item = &AgentId> {
        self.loading_order
            .iter()
            .filter(|id| !self.requested.contains(*id))
    }
}

/// Outcome of [`unload_all_with_dependencies`].
///
/// [`unload_all_with_dependencies`]: crate::loader::services::DependencyLoader::unload_all_with_dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnloadingReport {
    unloading_order: Vec<AgentId>,
    unloaded: Vec<AgentId>,
    cleared: Vec<AgentId>,
}

impl UnloadingReport {
    /// Creates a report.
    #[must_use]
    pub const fn new(
        unloading_order: Vec<AgentId>,
        unloaded: Vec<AgentId>,
        cleared: Vec<AgentId>,
    ) -> Self {
        Self {
            unloading_order,
            unloaded,
            cleared,
        }
    }

    /// Returns every agent considered, dependents first.
    #[must_use]
    pub fn unloading_order(&self) -> &[AgentId] {
        &self.unloading_order
    }

    /// Returns the agents that were unloaded, in unloading order.
    #[must_use]
    pub fn unloaded(&self) -> &[AgentId] {
        &self.unloaded
    }

    /// Returns the failed agents whose failure record was cleared.
    #[must_use]
    pub fn cleared(&self) -> &[AgentId] {
        &self.cleared
    }

    /// Returns the agents skipped because they were not loaded, including
    /// cleared failures.
    pub fn skipped(&self) -> impl Iterator<Item = &AgentId> {
        self.unloading_order
            .iter()
            .filter(|id| !self.unloaded.contains(*id))
    }
}

/// Loader activity counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingStatistics {
    /// Single-agent loads that ran to completion.
    pub loads_executed: usize,
    /// Single-agent loads that failed.
    pub load_failures: usize,
    /// Agents unloaded.
    pub unloads: usize,
    /// Bulk loads that succeeded.
    pub bulk_load_successes: usize,
    /// Bulk loads that failed.
    pub bulk_load_failures: usize,
}
