//! Requests routed to workspace agents.

use super::{AgentCapability, RequestId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Lowest accepted request priority.
pub const MIN_PRIORITY: u8 = 1;
/// Highest accepted request priority.
pub const MAX_PRIORITY: u8 = 10;
/// Priority assigned when the caller does not choose one.
pub const DEFAULT_PRIORITY: u8 = 5;

/// A request for work naming the capability it requires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    id: RequestId,
    request_type: String,
    description: String,
    capability: AgentCapability,
    source_project: String,
    target_project: Option<String>,
    priority: u8,
    parameters: BTreeMap<String, Value>,
    created_at: DateTime<Utc>,
}

impl AgentRequest {
    /// Creates a request with default priority and no target project.
    #[must_use]
    pub fn new(
        request_type: impl Into<String>,
        description: impl Into<String>,
        capability: AgentCapability,
        source_project: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: RequestId::new(),
            request_type: request_type.into().trim().to_owned(),
            description: description.into(),
            capability,
            source_project: source_project.into().trim().to_owned(),
            target_project: None,
            priority: DEFAULT_PRIORITY,
            parameters: BTreeMap::new(),
            created_at: clock.utc(),
        }
    }

    /// Sets the target project.
    ///
    /// A blank value clears the target.
    #[must_use]
    pub fn with_target_project(mut self, target_project: impl Into<String>) -> Self {
        let normalized = target_project.into().trim().to_owned();
        self.target_project = (!normalized.is_empty()).then_some(normalized);
        self
    }

    /// Sets the priority, clamped to `1..=10`.
    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
        self
    }

    /// Adds a free-form parameter.
    #[must_use]
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Returns the request type.
    #[must_use]
    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the capability the request requires.
    #[must_use]
    pub const fn capability(&self) -> AgentCapability {
        self.capability
    }

    /// Returns the source project.
    #[must_use]
    pub fn source_project(&self) -> &str {
        &self.source_project
    }

    /// Returns the target project, if any.
    #[must_use]
    pub fn target_project(&self) -> Option<&str> {
        self.target_project.as_deref()
    }

    /// Returns the priority in `1..=10`; higher is more urgent.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        self.priority
    }

    /// Returns a parameter by key.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Returns all parameters.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns whether the request spans two different projects.
    #[must_use]
    pub fn is_cross_project(&self) -> bool {
        self.target_project
            .as_deref()
            .is_some_and(|target| target != self.source_project)
    }

    /// Returns the projects the request touches: the source, then the
    /// target when it differs.
    pub fn involved_projects(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.source_project.as_str()).chain(
            self.target_project
                .as_deref()
                .filter(|target| *target != self.source_project),
        )
    }

    /// Returns whether the lowercased description contains `keyword`.
    #[must_use]
    pub fn description_mentions(&self, keyword: &str) -> bool {
        self.description.to_lowercase().contains(keyword)
    }
}
