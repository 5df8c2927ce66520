//! Scripted in-memory agent.

use async_trait::async_trait;
use mockable::DefaultClock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::agent_registry::{
    domain::{AgentCapability, AgentId, AgentRequest, AgentResponse, AgentStatus, AgentType},
    ports::{AgentError, AgentErrorKind, AgentResult, WorkspaceAgent},
};

/// Agent whose behaviour is fixed by configuration.
///
/// Capability scores, dependencies, guidance and latency are set with the
/// builder methods. Health and failure mode can be changed while the agent
/// is registered. Call counters let callers observe how often the agent was
/// asked to process requests or reinitialize.
#[derive(Debug)]
pub struct StaticAgent {
    id: AgentId,
    agent_type: AgentType,
    scores: BTreeMap<AgentCapability, u8>,
    dependencies: Vec<AgentId>,
    guidance: String,
    recommendations: Vec<String>,
    latency: Option<Duration>,
    status: Mutex<AgentStatus>,
    failure: Mutex<Option<AgentErrorKind>>,
    reinitialize_fails: bool,
    process_calls: AtomicUsize,
    reinitialize_calls: AtomicUsize,
}

impl StaticAgent {
    /// Creates a healthy agent with no capabilities or dependencies.
    #[must_use]
    pub fn new(id: AgentId, agent_type: AgentType) -> Self {
        let guidance = format!("guidance from {id}");
        Self {
            id,
            agent_type,
            scores: BTreeMap::new(),
            dependencies: Vec::new(),
            guidance,
            recommendations: Vec::new(),
            latency: None,
            status: Mutex::new(AgentStatus::Healthy),
            failure: Mutex::new(None),
            reinitialize_fails: false,
            process_calls: AtomicUsize::new(0),
            reinitialize_calls: AtomicUsize::new(0),
        }
    }

    /// Adds a capability with its score, clamped to `0..=100`.
    #[must_use]
    pub fn with_capability(mut self, capability: AgentCapability, score: u8) -> Self {
        self.scores.insert(capability, score.min(100));
        self
    }

    /// Appends a dependency.
    #[must_use]
    pub fn with_dependency(mut self, dependency: AgentId) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Sets the initial health status.
    #[must_use]
    pub fn with_status(self, status: AgentStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Sets the guidance returned for every request.
    #[must_use]
    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = guidance.into();
        self
    }

    /// Sets the recommendations returned for every request.
    #[must_use]
    pub fn with_recommendations(mut self, recommendations: impl IntoIterator<Item = String>) -> Self {
        self.recommendations = recommendations.into_iter().collect();
        self
    }

    /// Delays every `process` and `reinitialize` call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes every `process` call fail with `kind`.
    #[must_use]
    pub fn failing(self, kind: AgentErrorKind) -> Self {
        self.set_failure(Some(kind));
        self
    }

    /// Makes every `reinitialize` call fail.
    #[must_use]
    pub const fn failing_reinitialize(mut self) -> Self {
        self.reinitialize_fails = true;
        self
    }

    /// Replaces the health status.
    pub fn set_status(&self, status: AgentStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = status;
        }
    }

    /// Replaces the failure mode; `None` makes `process` succeed.
    pub fn set_failure(&self, kind: Option<AgentErrorKind>) {
        if let Ok(mut current) = self.failure.lock() {
            *current = kind;
        }
    }

    /// Returns how many times `process` was called.
    #[must_use]
    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    /// Returns how many times `reinitialize` was called.
    #[must_use]
    pub fn reinitialize_calls(&self) -> usize {
        self.reinitialize_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn current_failure(&self) -> Option<AgentErrorKind> {
        self.failure
            .lock()
            .map_or(Some(AgentErrorKind::Unavailable), |failure| *failure)
    }
}

#[async_trait]
impl WorkspaceAgent for StaticAgent {
    fn id(&self) -> &AgentId {
        &self.id
    }

    fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    fn capabilities(&self) -> BTreeSet<AgentCapability> {
        self.scores.keys().copied().collect()
    }

    fn capability_score(&self, capability: AgentCapability) -> u8 {
        self.scores.get(&capability).copied().unwrap_or_default()
    }

    fn dependencies(&self) -> Vec<AgentId> {
        self.dependencies.clone()
    }

    fn status(&self) -> AgentStatus {
        self.status.lock().map_or_else(
            |_| AgentStatus::unavailable("status lock poisoned"),
            |status| status.clone(),
        )
    }

    async fn process(&self, request: &AgentRequest) -> AgentResult<AgentResponse> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if let Some(kind) = self.current_failure() {
            return Err(AgentError::new(
                self.id.clone(),
                kind,
                format!("scripted failure for request {}", request.id()),
            ));
        }
        if !self.scores.contains_key(&request.capability()) {
            return Err(AgentError::new(
                self.id.clone(),
                AgentErrorKind::CapabilityMismatch,
                format!("capability {} is not offered", request.capability()),
            ));
        }

        Ok(
            AgentResponse::new(request.id(), self.guidance.clone(), &DefaultClock)
                .with_recommendations(self.recommendations.clone()),
        )
    }

    async fn reinitialize(&self) -> AgentResult<()> {
        self.reinitialize_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        if self.reinitialize_fails {
            return Err(AgentError::new(
                self.id.clone(),
                AgentErrorKind::ConfigurationError,
                "scripted reinitialization failure",
            ));
        }
        self.set_status(AgentStatus::Healthy);
        Ok(())
    }
}
