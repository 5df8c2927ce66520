//! Tunable thresholds for discovery, routing and performance tracking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Thresholds that drive routing strategy selection.
///
/// # Examples
///
/// ```
/// use switchyard::discovery::domain::RoutingPolicy;
///
/// let policy = RoutingPolicy::default();
/// assert_eq!(policy.urgent_priority, 8);
///
/// let conservative = RoutingPolicy::single_agent();
/// assert_eq!(conservative.max_coordinating, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingPolicy {
    /// Requests at or above this priority go straight to the top agent.
    pub urgent_priority: u8,
    /// Maximum score gap between the top two agents for coordination.
    pub coordination_gap: u8,
    /// Agents within this distance of the top score join a coordination.
    pub coordination_window: u8,
    /// Maximum number of agents in a coordination, primary included.
    pub max_coordinating: usize,
    /// Maximum number of fallbacks behind a primary.
    pub max_fallbacks: usize,
    /// Agents within this distance of the top score share load.
    pub load_balance_window: u8,
    /// Description keywords that mark a request as complex.
    pub complexity_keywords: Vec<String>,
}

impl Default for RoutingPolicy {
    fn default() -> Self {
        Self {
            urgent_priority: 8,
            coordination_gap: 10,
            coordination_window: 15,
            max_coordinating: 3,
            max_fallbacks: 2,
            load_balance_window: 5,
            complexity_keywords: ["integration", "migration", "architecture"]
                .map(str::to_owned)
                .to_vec(),
        }
    }
}

impl RoutingPolicy {
    /// Creates a policy that never coordinates agents.
    ///
    /// Every request is routed to one agent, optionally with fallbacks.
    /// Load is only balanced between agents with identical scores.
    #[must_use]
    pub fn single_agent() -> Self {
        Self {
            coordination_gap: 0,
            coordination_window: 0,
            max_coordinating: 1,
            load_balance_window: 0,
            ..Self::default()
        }
    }

    /// Returns whether `description` mentions a complexity keyword.
    #[must_use]
    pub fn is_complex(&self, description: &str) -> bool {
        let lowered = description.to_lowercase();
        self.complexity_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
    }
}

/// A technology and the description words that imply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyKeyword {
    /// Canonical technology name, as listed in agent metadata.
    pub technology: String,
    /// Lowercase words that imply the technology.
    pub keywords: Vec<String>,
}

impl TechnologyKeyword {
    /// Creates a keyword table entry.
    #[must_use]
    pub fn new(technology: &str, keywords: &[&str]) -> Self {
        Self {
            technology: technology.to_owned(),
            keywords: keywords.iter().map(|keyword| (*keyword).to_owned()).collect(),
        }
    }
}

/// Filters applied to capability candidates before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Minimum rolling success rate, in permille.
    pub min_success_permille: u32,
    /// Maximum rolling average latency, in milliseconds.
    pub max_average_latency_ms: u64,
    /// Table used to extract required technologies from descriptions.
    pub technology_keywords: Vec<TechnologyKeyword>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            min_success_permille: 950,
            max_average_latency_ms: 5_000,
            technology_keywords: vec![
                TechnologyKeyword::new("spring-boot", &["spring boot", "java"]),
                TechnologyKeyword::new("postgresql", &["postgresql", "database"]),
                TechnologyKeyword::new("aws", &["aws", "fargate"]),
                TechnologyKeyword::new("moqui", &["moqui", "groovy"]),
                TechnologyKeyword::new("vue", &["vue", "javascript"]),
                TechnologyKeyword::new("rest-api", &["rest", "api"]),
                TechnologyKeyword::new("jwt", &["jwt", "authentication"]),
            ],
        }
    }
}

impl DiscoveryConfig {
    /// Creates a configuration that skips technology matching and accepts
    /// any performance history.
    #[must_use]
    pub const fn permissive() -> Self {
        Self {
            min_success_permille: 0,
            max_average_latency_ms: u64::MAX,
            technology_keywords: Vec::new(),
        }
    }

    /// Returns the technologies implied by `description`.
    #[must_use]
    pub fn technologies_in(&self, description: &str) -> BTreeSet<String> {
        let lowered = description.to_lowercase();
        self.technology_keywords
            .iter()
            .filter(|entry| {
                entry
                    .keywords
                    .iter()
                    .any(|keyword| lowered.contains(keyword.as_str()))
            })
            .map(|entry| entry.technology.clone())
            .collect()
    }
}

/// Settings for rolling performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Number of most recent samples kept per agent.
    pub window_size: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { window_size: 100 }
    }
}
