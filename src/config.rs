//! Aggregated coordination settings.
//!
//! [`CoordinationConfig`] gathers routing, discovery, dispatch and monitor
//! settings into one document. Every section and field is optional and
//! falls back to its default, so a partial document only overrides what it
//! names. Reading the document from disk is left to the embedding
//! application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discovery::domain::{DiscoveryConfig, MonitorConfig, RoutingPolicy};
use crate::dispatch::domain::DispatchConfig;

/// Errors returned while loading a [`CoordinationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has fields of the wrong type.
    #[error("invalid coordination config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings for every coordination component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinationConfig {
    /// Routing strategy thresholds.
    pub routing: RoutingPolicy,
    /// Candidate filters and technology keywords.
    pub discovery: DiscoveryConfig,
    /// Request execution settings.
    pub dispatch: DispatchConfig,
    /// Rolling metrics settings.
    pub monitor: MonitorConfig,
}

impl CoordinationConfig {
    /// Parses a JSON document, filling omitted settings with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is malformed.
    pub fn from_json_str(document: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(document)?)
    }
}
