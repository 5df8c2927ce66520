//! Capability registry: the single source of truth about registered agents.
//!
//! [`CapabilityRegistry`] owns the agent table, the capability index, the
//! dependency graph and the version history behind one read/write lock.
//! Only [`CapabilityRegistry::register`], [`CapabilityRegistry::unregister`]
//! and [`CapabilityRegistry::update_version`] mutate it, and each mutation
//! is validated in full before any field changes.

use crate::agent_registry::{
    domain::{
        AgentCapability, AgentDomainError, AgentId, AgentMetadata, AgentType, AgentVersion,
        DependencyCycleError, DependencyGraph, RegisteredAgent, VersionRecord, join_ids,
    },
    ports::AgentHandle,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] AgentDomainError),

    /// An agent with the same identifier is already registered.
    #[error("agent already registered: {0}")]
    DuplicateAgent(AgentId),

    /// No agent with the identifier is registered.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Metadata type, capabilities or required versions differ from what
    /// the agent declares.
    #[error("metadata for agent {0} does not match its declared type, capabilities and dependencies")]
    MetadataMismatch(AgentId),

    /// A declared dependency is not registered.
    #[error("agent {agent} depends on unregistered agent {dependency}")]
    MissingDependency {
        /// Agent being registered.
        agent: AgentId,
        /// Dependency that is absent.
        dependency: AgentId,
    },

    /// A dependency is registered with a version the agent cannot use.
    #[error("agent {agent} requires {dependency} version {required}, found {installed}")]
    IncompatibleDependencyVersion {
        /// Agent being registered.
        agent: AgentId,
        /// Dependency with the wrong version.
        dependency: AgentId,
        /// Version the agent requires.
        required: String,
        /// Version currently registered.
        installed: String,
    },

    /// The registration would close a dependency cycle.
    #[error("registering agent {0} would create a circular dependency")]
    CircularDependency(AgentId),

    /// Unregistering is blocked by agents that depend on this one.
    #[error("agent {agent} is required by: {}", join_ids(.dependents))]
    HasDependents {
        /// Agent being unregistered.
        agent: AgentId,
        /// Every current dependent.
        dependents: BTreeSet<AgentId>,
    },

    /// A version update would break agents that depend on this one.
    #[error("version {version} of agent {agent} is incompatible with: {}", join_ids(.dependents))]
    IncompatibleDependents {
        /// Agent being updated.
        agent: AgentId,
        /// Rejected version.
        version: String,
        /// Dependents whose required version is not satisfied.
        dependents: BTreeSet<AgentId>,
    },

    /// The requested agents cannot be ordered.
    #[error(transparent)]
    Unordered(#[from] DependencyCycleError),

    /// The registry lock was poisoned by a panicking writer.
    #[error("registry state is unavailable: {0}")]
    LockPoisoned(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Outcome of a successful version update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionUpdate {
    /// Updated agent.
    pub agent: AgentId,
    /// Version before the update.
    pub previous: AgentVersion,
    /// Version after the update.
    pub current: VersionRecord,
}

/// Number of registration events and version updates kept for
/// [`RegistryStatistics`].
pub const RECENT_EVENT_LIMIT: usize = 100;

/// Whether an agent joined or left the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEventKind {
    /// The agent was registered.
    Registered,
    /// The agent was unregistered.
    Unregistered,
}

/// One registration or unregistration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEvent {
    /// Agent concerned.
    pub agent: AgentId,
    /// Type of the agent.
    pub agent_type: AgentType,
    /// What happened.
    pub kind: RegistrationEventKind,
    /// When it happened.
    pub at: DateTime<Utc>,
}

/// Counters and recent history describing registry activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStatistics {
    /// Agents currently registered.
    pub registered_agents: usize,
    /// Successful registrations since creation.
    pub registrations: u64,
    /// Successful unregistrations since creation.
    pub unregistrations: u64,
    /// Successful version updates since creation.
    pub version_updates: u64,
    /// Registered agents per type.
    pub agents_by_type: BTreeMap<AgentType, usize>,
    /// Latest registration events, newest first.
    pub recent_registrations: Vec<RegistrationEvent>,
    /// Latest version updates, newest first.
    pub recent_version_updates: Vec<VersionUpdate>,
}

#[derive(Debug, Default)]
struct RegistryState {
    agents: BTreeMap<AgentId, RegisteredAgent>,
    capability_index: BTreeMap<AgentCapability, BTreeSet<AgentId>>,
    graph: DependencyGraph,
    versions: BTreeMap<AgentId, VersionRecord>,
    registrations: u64,
    unregistrations: u64,
    version_updates: u64,
    registration_events: VecDeque<RegistrationEvent>,
    version_history: VecDeque<VersionUpdate>,
}

fn push_bounded<T>(queue: &mut VecDeque<T>, item: T) {
    if queue.len() == RECENT_EVENT_LIMIT {
        queue.pop_front();
    }
    queue.push_back(item);
}

impl RegistryState {
    fn validate_registration(
        &self,
        agent: &AgentHandle,
        metadata: &AgentMetadata,
    ) -> RegistryResult<Vec<AgentId>> {
        let id = agent.id();
        if self.agents.contains_key(id) {
            return Err(RegistryError::DuplicateAgent(id.clone()));
        }
        if metadata.agent_type() != agent.agent_type()
            || *metadata.capabilities() != agent.capabilities()
        {
            return Err(RegistryError::MetadataMismatch(id.clone()));
        }

        let declared = agent.dependencies();
        if let Some(undeclared) = metadata
            .required_versions()
            .keys()
            .find(|dependency| !declared.contains(dependency))
        {
            debug!(agent = %id, dependency = %undeclared, "required version for undeclared dependency");
            return Err(RegistryError::MetadataMismatch(id.clone()));
        }
        if self.graph.would_create_cycle(id, &declared) {
            return Err(RegistryError::CircularDependency(id.clone()));
        }
        for dependency in &declared {
            let Some(installed) = self.versions.get(dependency) else {
                return Err(RegistryError::MissingDependency {
                    agent: id.clone(),
                    dependency: dependency.clone(),
                });
            };
            if let Some(required) = metadata.required_version(dependency)
                && !installed.version().is_compatible_with(required)
            {
                return Err(RegistryError::IncompatibleDependencyVersion {
                    agent: id.clone(),
                    dependency: dependency.clone(),
                    required: required.to_string(),
                    installed: installed.version().to_string(),
                });
            }
        }
        Ok(declared)
    }

    fn insert(&mut self, entry: RegisteredAgent, dependencies: Vec<AgentId>, clock: &impl Clock) {
        let id = entry.id().clone();
        for capability in entry.metadata().capabilities() {
            self.capability_index
                .entry(*capability)
                .or_default()
                .insert(id.clone());
        }
        self.graph.insert(id.clone(), dependencies);
        self.versions.insert(
            id.clone(),
            VersionRecord::new(entry.metadata().version().clone(), clock.utc()),
        );
        push_bounded(
            &mut self.registration_events,
            RegistrationEvent {
                agent: id.clone(),
                agent_type: entry.metadata().agent_type(),
                kind: RegistrationEventKind::Registered,
                at: clock.utc(),
            },
        );
        self.agents.insert(id, entry);
        self.registrations = self.registrations.saturating_add(1);
    }

    fn remove(&mut self, id: &AgentId, clock: &impl Clock) -> Option<RegisteredAgent> {
        let entry = self.agents.remove(id)?;
        for capability in entry.metadata().capabilities() {
            if let Some(ids) = self.capability_index.get_mut(capability) {
                ids.remove(id);
                if ids.is_empty() {
                    self.capability_index.remove(capability);
                }
            }
        }
        self.graph.remove(id);
        self.versions.remove(id);
        self.unregistrations = self.unregistrations.saturating_add(1);
        push_bounded(
            &mut self.registration_events,
            RegistrationEvent {
                agent: id.clone(),
                agent_type: entry.metadata().agent_type(),
                kind: RegistrationEventKind::Unregistered,
                at: clock.utc(),
            },
        );
        Some(entry)
    }

    fn incompatible_dependents(&self, id: &AgentId, version: &AgentVersion) -> BTreeSet<AgentId> {
        self.graph
            .dependents(id)
            .into_iter()
            .filter(|dependent| {
                self.agents
                    .get(dependent)
                    .and_then(|entry| entry.metadata().required_version(id))
                    .is_some_and(|required| !version.is_compatible_with(required))
            })
            .collect()
    }

    fn dependency_ordered(&self, ids: &BTreeSet<AgentId>) -> RegistryResult<Vec<AgentId>> {
        Ok(self.graph.topological_order(ids)?)
    }

    fn healthy_with_capability(
        &self,
        capability: AgentCapability,
    ) -> RegistryResult<Vec<RegisteredAgent>> {
        let healthy: BTreeSet<AgentId> = self
            .capability_index
            .get(&capability)
            .into_iter()
            .flatten()
            .filter(|id| {
                self.agents
                    .get(*id)
                    .is_some_and(|entry| entry.agent().status().is_healthy())
            })
            .cloned()
            .collect();
        Ok(self
            .dependency_ordered(&healthy)?
            .iter()
            .filter_map(|id| self.agents.get(id).cloned())
            .collect())
    }
}

/// Thread-safe registry of workspace agents.
#[derive(Debug)]
pub struct CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    state: RwLock<RegistryState>,
    clock: Arc<C>,
}

impl<C> CapabilityRegistry<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            clock,
        }
    }

    /// Registers an agent with its metadata.
    ///
    /// Every dependency the agent declares must already be registered with
    /// a version satisfying `metadata`'s requirements, and the new edges must
    /// not close a cycle. On failure the registry is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAgent`],
    /// [`RegistryError::MetadataMismatch`],
    /// [`RegistryError::MissingDependency`],
    /// [`RegistryError::IncompatibleDependencyVersion`] or
    /// [`RegistryError::CircularDependency`] when validation fails, and
    /// [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn register(
        &self,
        agent: AgentHandle,
        metadata: AgentMetadata,
    ) -> RegistryResult<RegisteredAgent> {
        let mut state = self.write()?;
        let dependencies = state
            .validate_registration(&agent, &metadata)
            .inspect_err(|err| {
                warn!(agent = %agent.id(), error = %err, "agent registration rejected");
            })?;

        let entry = RegisteredAgent::new(agent, metadata, &*self.clock);
        info!(
            agent = %entry.id(),
            agent_type = %entry.metadata().agent_type(),
            version = %entry.metadata().version(),
            capabilities = entry.metadata().capabilities().len(),
            "agent registered"
        );
        state.insert(entry.clone(), dependencies, &*self.clock);
        Ok(entry)
    }

    /// Removes an agent from the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] for unknown agents,
    /// [`RegistryError::HasDependents`] naming every dependent when other
    /// agents still depend on this one, and [`RegistryError::LockPoisoned`]
    /// when the state is unavailable.
    pub fn unregister(&self, id: &AgentId) -> RegistryResult<RegisteredAgent> {
        let mut state = self.write()?;
        if !state.agents.contains_key(id) {
            return Err(RegistryError::NotFound(id.clone()));
        }
        let dependents = state.graph.dependents(id);
        if !dependents.is_empty() {
            warn!(agent = %id, dependents = %join_ids(&dependents), "agent unregistration blocked");
            return Err(RegistryError::HasDependents {
                agent: id.clone(),
                dependents,
            });
        }
        let entry = state
            .remove(id, &*self.clock)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        info!(agent = %id, "agent unregistered");
        Ok(entry)
    }

    /// Replaces the version of a registered agent.
    ///
    /// The update is rejected when any dependent declares a required
    /// version that `version` does not satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] for malformed versions,
    /// [`RegistryError::NotFound`] for unknown agents,
    /// [`RegistryError::IncompatibleDependents`] naming the broken
    /// dependents, and [`RegistryError::LockPoisoned`] when the state is
    /// unavailable.
    pub fn update_version(&self, id: &AgentId, version: &str) -> RegistryResult<VersionUpdate> {
        let new_version = AgentVersion::new(version)?;
        let mut state = self.write()?;
        let previous = state
            .agents
            .get(id)
            .map(|entry| entry.metadata().version().clone())
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        let incompatible = state.incompatible_dependents(id, &new_version);
        if !incompatible.is_empty() {
            warn!(
                agent = %id,
                version = %new_version,
                dependents = %join_ids(&incompatible),
                "version update rejected"
            );
            return Err(RegistryError::IncompatibleDependents {
                agent: id.clone(),
                version: new_version.to_string(),
                dependents: incompatible,
            });
        }

        let record = VersionRecord::new(new_version.clone(), self.clock.utc());
        if let Some(entry) = state.agents.get_mut(id) {
            let metadata = entry.metadata().with_version(new_version);
            entry.replace_metadata(metadata);
        }
        state.versions.insert(id.clone(), record.clone());
        state.version_updates = state.version_updates.saturating_add(1);
        info!(agent = %id, from = %previous, to = %record.version(), "agent version updated");

        let update = VersionUpdate {
            agent: id.clone(),
            previous,
            current: record,
        };
        push_bounded(&mut state.version_history, update.clone());
        Ok(update)
    }

    /// Returns healthy agents offering `capability`, dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn discover_by_capability(
        &self,
        capability: AgentCapability,
    ) -> RegistryResult<Vec<AgentHandle>> {
        Ok(self
            .healthy_with_capability(capability)?
            .into_iter()
            .map(|entry| Arc::clone(entry.agent()))
            .collect())
    }

    /// Returns registry entries of healthy agents offering `capability`,
    /// dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn healthy_with_capability(
        &self,
        capability: AgentCapability,
    ) -> RegistryResult<Vec<RegisteredAgent>> {
        let entries = self.read()?.healthy_with_capability(capability)?;
        debug!(capability = %capability, found = entries.len(), "capability lookup");
        Ok(entries)
    }

    /// Orders `ids` so every dependency precedes its dependents.
    ///
    /// Ties are broken by ascending identifier. Unregistered identifiers are
    /// ordered as isolated agents.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn resolve_loading_order<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a AgentId>,
    ) -> RegistryResult<Vec<AgentId>> {
        let requested: BTreeSet<AgentId> = ids.into_iter().cloned().collect();
        self.read()?.dependency_ordered(&requested)
    }

    /// Returns `ids` together with everything they transitively depend on.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn dependency_closure<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a AgentId>,
    ) -> RegistryResult<BTreeSet<AgentId>> {
        Ok(self.read()?.graph.dependency_closure(ids))
    }

    /// Returns `ids` together with everything that transitively depends on
    /// them.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn dependent_closure<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a AgentId>,
    ) -> RegistryResult<BTreeSet<AgentId>> {
        Ok(self.read()?.graph.dependent_closure(ids))
    }

    /// Finds a registered agent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn find(&self, id: &AgentId) -> RegistryResult<Option<RegisteredAgent>> {
        Ok(self.read()?.agents.get(id).cloned())
    }

    /// Returns every registered agent ordered by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn list_all(&self) -> RegistryResult<Vec<RegisteredAgent>> {
        Ok(self.read()?.agents.values().cloned().collect())
    }

    /// Returns healthy agents of `agent_type`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn agents_by_type(&self, agent_type: AgentType) -> RegistryResult<Vec<RegisteredAgent>> {
        Ok(self
            .read()?
            .agents
            .values()
            .filter(|entry| {
                entry.metadata().agent_type() == agent_type && entry.agent().status().is_healthy()
            })
            .cloned()
            .collect())
    }

    /// Returns the current version record of an agent.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn version_of(&self, id: &AgentId) -> RegistryResult<Option<VersionRecord>> {
        Ok(self.read()?.versions.get(id).cloned())
    }

    /// Returns the agents that directly depend on `id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn dependents_of(&self, id: &AgentId) -> RegistryResult<BTreeSet<AgentId>> {
        Ok(self.read()?.graph.dependents(id))
    }

    /// Returns the identifiers indexed under `capability`, regardless of
    /// health.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn agents_with_capability(
        &self,
        capability: AgentCapability,
    ) -> RegistryResult<BTreeSet<AgentId>> {
        Ok(self
            .read()?
            .capability_index
            .get(&capability)
            .cloned()
            .unwrap_or_default())
    }

    /// Returns the number of registered agents.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn len(&self) -> RegistryResult<usize> {
        Ok(self.read()?.agents.len())
    }

    /// Returns whether no agents are registered.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.read()?.agents.is_empty())
    }

    /// Returns activity counters.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::LockPoisoned`] when the state is unavailable.
    pub fn statistics(&self) -> RegistryResult<RegistryStatistics> {
        let state = self.read()?;
        let mut agents_by_type = BTreeMap::new();
        for entry in state.agents.values() {
            *agents_by_type
                .entry(entry.metadata().agent_type())
                .or_insert(0_usize) += 1;
        }
        Ok(RegistryStatistics {
            registered_agents: state.agents.len(),
            registrations: state.registrations,
            unregistrations: state.unregistrations,
            version_updates: state.version_updates,
            agents_by_type,
            recent_registrations: state.registration_events.iter().rev().cloned().collect(),
            recent_version_updates: state.version_history.iter().rev().cloned().collect(),
        })
    }

    fn read(&self) -> RegistryResult<RwLockReadGuard<'_, RegistryState>> {
        self.state
            .read()
            .map_err(|err| RegistryError::LockPoisoned(err.to_string()))
    }

    fn write(&self) -> RegistryResult<RwLockWriteGuard<'_, RegistryState>> {
        self.state
            .write()
            .map_err(|err| RegistryError::LockPoisoned(err.to_string()))
    }
}
