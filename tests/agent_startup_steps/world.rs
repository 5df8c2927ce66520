//! Shared world state for agent start-up scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchyard::{
    agent_registry::{
        adapters::memory::StaticAgent,
        domain::{AgentId, AgentMetadata, AgentVersion},
        ports::AgentHandle,
        services::CapabilityRegistry,
    },
    discovery::services::{DiscoveryService, PerformanceMonitor},
    dispatch::{
        domain::{DispatchConfig, DispatchError, DispatchOutcome},
        services::RequestDispatcher,
    },
    loader::{
        domain::{LoadError, LoadingReport, UnloadingReport},
        services::DependencyLoader,
    },
};

/// Scenario world for start-up, shut-down and routing behaviour tests.
pub struct StartupWorld {
    /// Registry shared by every component.
    pub registry: Arc<CapabilityRegistry<DefaultClock>>,
    /// Loader under test.
    pub loader: Arc<DependencyLoader<DefaultClock>>,
    /// Dispatcher under test.
    pub dispatcher: RequestDispatcher<DefaultClock>,
    /// Registered agents by name.
    pub agents: BTreeMap<String, Arc<StaticAgent>>,
    /// Result of the last bulk start.
    pub last_start: Option<Result<LoadingReport, LoadError>>,
    /// Results of the last concurrent start.
    pub concurrent_starts: Vec<Result<(), LoadError>>,
    /// Result of the last bulk stop.
    pub last_stop: Option<Result<UnloadingReport, LoadError>>,
    /// Result of the last dispatch.
    pub last_dispatch: Option<Result<DispatchOutcome, DispatchError>>,
}

impl StartupWorld {
    /// Creates a world with an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let registry = Arc::new(CapabilityRegistry::new(Arc::clone(&clock)));
        let monitor = Arc::new(PerformanceMonitor::default());
        let discovery = DiscoveryService::new(Arc::clone(&registry), monitor, clock);
        Self {
            loader: Arc::new(DependencyLoader::new(Arc::clone(&registry))),
            dispatcher: RequestDispatcher::new(discovery, DispatchConfig::default()),
            registry,
            agents: BTreeMap::new(),
            last_start: None,
            concurrent_starts: Vec::new(),
            last_stop: None,
            last_dispatch: None,
        }
    }

    /// Registers `agent` with default metadata.
    ///
    /// # Errors
    ///
    /// Returns an error when the registry rejects the agent.
    pub fn register(&mut self, name: &str, agent: StaticAgent) -> Result<(), eyre::Report> {
        let shared = Arc::new(agent);
        let version = AgentVersion::new("1.0.0")?;
        let metadata = AgentMetadata::for_agent(shared.as_ref(), version);
        let handle: AgentHandle = Arc::clone(&shared) as AgentHandle;
        self.registry.register(handle, metadata)?;
        self.agents.insert(name.to_owned(), shared);
        Ok(())
    }

    /// Returns a registered agent by name.
    ///
    /// # Errors
    ///
    /// Returns an error when no agent of that name was registered.
    pub fn agent(&self, name: &str) -> Result<&Arc<StaticAgent>, eyre::Report> {
        self.agents
            .get(name)
            .ok_or_else(|| eyre::eyre!("no agent named '{name}' in scenario world"))
    }
}

impl Default for StartupWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> StartupWorld {
    StartupWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a validated agent identifier.
///
/// # Errors
///
/// Returns an error when `name` is not a valid identifier.
pub fn agent_id(name: &str) -> Result<AgentId, eyre::Report> {
    Ok(AgentId::new(name)?)
}

/// Parses a comma-separated list of agent identifiers.
///
/// # Errors
///
/// Returns an error when any entry is not a valid identifier.
pub fn agent_ids(names: &str) -> Result<Vec<AgentId>, eyre::Report> {
    names.split(',').map(|name| agent_id(name.trim())).collect()
}
