//! Domain model for discovery and routing.
//!
//! Scored candidates, routing decisions, discovery outcomes and counters,
//! rolling performance metrics and the thresholds that tune them.

mod config;
mod decision;
mod metrics;
mod result;
mod scored;
mod statistics;

pub use config::{DiscoveryConfig, MonitorConfig, RoutingPolicy, TechnologyKeyword};
pub use decision::{RoutingDecision, RoutingType};
pub use metrics::{AgentMetrics, Sample};
pub use result::{DiscoveryFailure, DiscoveryResult};
pub use scored::{MAX_SCORE, ScoredAgent};
pub use statistics::{DiscoveryMetrics, DiscoveryStatistics};
