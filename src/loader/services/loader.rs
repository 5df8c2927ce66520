//! Dependency-ordered agent bring-up and tear-down.
//!
//! Each agent is loaded at most once per loader. The first caller of
//! [`DependencyLoader::load_with_dependencies`] spawns the load on the Tokio
//! runtime and every later caller receives a clone of the same shared
//! future, so concurrent requests observe a single execution and identical
//! results. Completed loads stay cached until the agent is unloaded.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use mockable::Clock;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::agent_registry::{
    domain::{AgentId, RegisteredAgent},
    services::CapabilityRegistry,
};
use crate::loader::domain::{
    LoadError, LoadingReport, LoadingState, LoadingStatistics, UnloadingReport,
};

/// Shared handle to one agent's load. Cloning it does not start a new load.
pub type LoadFuture = Shared<BoxFuture<'static, Result<(), LoadError>>>;

#[derive(Debug, Default)]
struct LoaderState {
    states: BTreeMap<AgentId, LoadingState>,
    statistics: LoadingStatistics,
}

impl LoaderState {
    fn state_of(&self, id: &AgentId) -> LoadingState {
        self.states.get(id).copied().unwrap_or_default()
    }

    fn transition(&mut self, id: &AgentId, target: LoadingState) -> Result<(), LoadError> {
        let current = self.state_of(id);
        if !current.can_transition_to(target) {
            return Err(LoadError::InvalidTransition {
                agent: id.clone(),
                from: current,
                to: target,
            });
        }
        if target == LoadingState::NotLoaded {
            self.states.remove(id);
        } else {
            self.states.insert(id.clone(), target);
        }
        debug!(agent = %id, from = %current, to = %target, "loading state changed");
        Ok(())
    }
}

/// Loads and unloads agents in dependency order.
pub struct DependencyLoader<C>
where
    C: Clock + Send + Sync,
{
    registry: Arc<CapabilityRegistry<C>>,
    state: Mutex<LoaderState>,
    in_flight: Mutex<BTreeMap<AgentId, LoadFuture>>,
}

impl<C> std::fmt::Debug for DependencyLoader<C>
where
    C: Clock + Send + Sync,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DependencyLoader")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<C> DependencyLoader<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a loader over `registry`.
    #[must_use]
    pub fn new(registry: Arc<CapabilityRegistry<C>>) -> Self {
        Self {
            registry,
            state: Mutex::new(LoaderState::default()),
            in_flight: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the shared load of `id` and its dependencies.
    ///
    /// The load runs on the current Tokio runtime. Dropping the returned
    /// future does not cancel it.
    pub fn load_with_dependencies(self: &Arc<Self>, id: &AgentId) -> LoadFuture {
        match self.start_load(id) {
            Ok(load) => load,
            Err(err) => future::ready(Err(err)).boxed().shared(),
        }
    }

    fn start_load(self: &Arc<Self>, id: &AgentId) -> Result<LoadFuture, LoadError> {
        let mut in_flight = self.in_flight()?;
        if let Some(existing) = in_flight.get(id) {
            debug!(agent = %id, "joining in-flight load");
            return Ok(existing.clone());
        }

        let entry = self
            .registry
            .find(id)?
            .ok_or_else(|| LoadError::NotRegistered(id.clone()))?;
        let runtime =
            Handle::try_current().map_err(|_| LoadError::RuntimeUnavailable(id.clone()))?;

        let loader = Arc::clone(self);
        let task = runtime.spawn(async move { loader.run_load(entry).await });
        let agent = id.clone();
        let load = async move {
            task.await
                .unwrap_or_else(|_| Err(LoadError::TaskAborted(agent)))
        }
        .boxed()
        .shared();
        in_flight.insert(id.clone(), load.clone());
        Ok(load)
    }

    async fn run_load(self: Arc<Self>, entry: RegisteredAgent) -> Result<(), LoadError> {
        let id = entry.id().clone();
        self.lock_state()?.transition(&id, LoadingState::Loading)?;
        info!(agent = %id, "loading agent");

        match self.initialize(&entry).await {
            Ok(()) => {
                let mut state = self.lock_state()?;
                state.transition(&id, LoadingState::Loaded)?;
                state.statistics.loads_executed =
                    state.statistics.loads_executed.saturating_add(1);
                info!(agent = %id, "agent loaded");
                Ok(())
            }
            Err(err) => {
                let mut state = self.lock_state()?;
                if let Err(state_err) = state.transition(&id, LoadingState::Failed) {
                    warn!(agent = %id, error = %state_err, "could not record load failure");
                }
                state.statistics.load_failures =
                    state.statistics.load_failures.saturating_add(1);
                warn!(agent = %id, error = %err, "agent failed to load");
                Err(err)
            }
        }
    }

    async fn initialize(self: &Arc<Self>, entry: &RegisteredAgent) -> Result<(), LoadError> {
        let agent = entry.agent();
        for dependency in agent.dependencies() {
            self.load_with_dependencies(&dependency)
                .await
                .map_err(|source| LoadError::DependencyFailed {
                    agent: entry.id().clone(),
                    dependency,
                    source: Box::new(source),
                })?;
        }

        if !agent.status().is_healthy() {
            debug!(agent = %entry.id(), status = %agent.status(), "reinitializing agent");
            agent
                .reinitialize()
                .await
                .map_err(|source| LoadError::InitializationFailed {
                    agent: entry.id().clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Loads `ids` and everything they depend on, dependencies first.
    ///
    /// Agents already loaded are not loaded again. After loading, every
    /// agent's dependencies are checked to be loaded and healthy.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotRegistered`] before loading anything when a
    /// requested agent is unknown. Otherwise returns the error of the first
    /// agent that failed to load, or [`LoadError::DependencyUnsatisfied`]
    /// when verification fails.
    pub async fn load_all_with_dependencies<'a>(
        self: &Arc<Self>,
        ids: impl IntoIterator<Item = &'a AgentId>,
    ) -> Result<LoadingReport, LoadError> {
        let requested: BTreeSet<AgentId> = ids.into_iter().cloned().collect();
        let outcome = self.load_requested(requested).await;

        let mut state = self.lock_state()?;
        match &outcome {
            Ok(report) => {
                state.statistics.bulk_load_successes =
                    state.statistics.bulk_load_successes.saturating_add(1);
                info!(
                    requested = report.requested().len(),
                    loaded = report.loading_order().len(),
                    "bulk load finished"
                );
            }
            Err(err) => {
                state.statistics.bulk_load_failures =
                    state.statistics.bulk_load_failures.saturating_add(1);
                warn!(error = %err, "bulk load failed");
            }
        }
        outcome
    }

    async fn load_requested(
        self: &Arc<Self>,
        requested: BTreeSet<AgentId>,
    ) -> Result<LoadingReport, LoadError> {
        for id in &requested {
            if self.registry.find(id)?.is_none() {
                return Err(LoadError::NotRegistered(id.clone()));
            }
        }

        let closure = self.registry.dependency_closure(&requested)?;
        let order = self.registry.resolve_loading_order(&closure)?;
        debug!(order = ?order, "resolved loading order");

        for id in &order {
            self.load_with_dependencies(id).await?;
        }
        self.verify(&order)?;
        Ok(LoadingReport::new(requested, order))
    }

    fn verify(&self, order: &[AgentId]) -> Result<(), LoadError> {
        for id in order {
            let entry = self
                .registry
                .find(id)?
                .ok_or_else(|| LoadError::NotRegistered(id.clone()))?;
            for dependency in entry.agent().dependencies() {
                let ready = self.lock_state()?.state_of(&dependency) == LoadingState::Loaded
                    && self
                        .registry
                        .find(&dependency)?
                        .is_some_and(|dep| dep.agent().status().is_healthy());
                if !ready {
                    return Err(LoadError::DependencyUnsatisfied {
                        agent: id.clone(),
                        dependency,
                    });
                }
            }
        }
        Ok(())
    }

    /// Unloads `ids` and everything that depends on them, dependents first.
    ///
    /// Agents that are not loaded are skipped. Failed agents are skipped as
    /// well; their failure record and cached load are cleared so a later
    /// load runs again. Unloading is all or nothing: every remaining agent
    /// is checked before any state changes.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotRegistered`] for an unknown agent and
    /// [`LoadError::InvalidTransition`] when an affected agent is loading
    /// or already unloading.
    pub fn unload_all_with_dependencies<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a AgentId>,
    ) -> Result<UnloadingReport, LoadError> {
        let requested: BTreeSet<AgentId> = ids.into_iter().cloned().collect();
        for id in &requested {
            if self.registry.find(id)?.is_none() {
                return Err(LoadError::NotRegistered(id.clone()));
            }
        }

        let affected = self.registry.dependent_closure(&requested)?;
        let mut order = self.registry.resolve_loading_order(&affected)?;
        order.reverse();

        let mut in_flight = self.in_flight()?;
        let mut state = self.lock_state()?;
        let mut unloaded = Vec::new();
        let mut cleared = Vec::new();
        for id in &order {
            match state.state_of(id) {
                LoadingState::NotLoaded => {}
                LoadingState::Loaded => unloaded.push(id.clone()),
                LoadingState::Failed => cleared.push(id.clone()),
                blocked @ (LoadingState::Loading | LoadingState::Unloading) => {
                    return Err(LoadError::InvalidTransition {
                        agent: id.clone(),
                        from: blocked,
                        to: LoadingState::Unloading,
                    });
                }
            }
        }

        for id in &cleared {
            state.transition(id, LoadingState::NotLoaded)?;
            in_flight.remove(id);
            debug!(agent = %id, "cleared failed load");
        }
        for id in &unloaded {
            state.transition(id, LoadingState::Unloading)?;
            in_flight.remove(id);
            state.transition(id, LoadingState::NotLoaded)?;
            state.statistics.unloads =
                state.statistics.unloads.saturating_add(1);
            info!(agent = %id, "agent unloaded");
        }
        Ok(UnloadingReport::new(order, unloaded, cleared))
    }

    /// Returns the loading state of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::StatePoisoned`] when the state is unavailable.
    pub fn state_of(&self, id: &AgentId) -> Result<LoadingState, LoadError> {
        Ok(self.lock_state()?.state_of(id))
    }

    /// Returns activity counters.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::StatePoisoned`] when the state is unavailable.
    pub fn statistics(&self) -> Result<LoadingStatistics, LoadError> {
        Ok(self.lock_state()?.statistics)
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, LoaderState>, LoadError> {
        self.state
            .lock()
            .map_err(|err| LoadError::StatePoisoned(err.to_string()))
    }

    fn in_flight(&self) -> Result<MutexGuard<'_, BTreeMap<AgentId, LoadFuture>>, LoadError> {
        self.in_flight
            .lock()
            .map_err(|err| LoadError::StatePoisoned(err.to_string()))
    }
}
