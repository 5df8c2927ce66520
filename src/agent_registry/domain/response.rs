//! Responses produced by workspace agents.

use super::RequestId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Guidance returned by an agent for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    request_id: RequestId,
    guidance: String,
    recommendations: Vec<String>,
    metadata: BTreeMap<String, Value>,
    responded_at: DateTime<Utc>,
}

impl AgentResponse {
    /// Creates a response for `request_id`.
    #[must_use]
    pub fn new(request_id: RequestId, guidance: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            request_id,
            guidance: guidance.into(),
            recommendations: Vec::new(),
            metadata: BTreeMap::new(),
            responded_at: clock.utc(),
        }
    }

    /// Sets the recommendations.
    #[must_use]
    pub fn with_recommendations(mut self, recommendations: impl IntoIterator<Item = String>) -> Self {
        self.recommendations = recommendations.into_iter().collect();
        self
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Returns the identifier of the request this response answers.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the guidance text.
    #[must_use]
    pub fn guidance(&self) -> &str {
        &self.guidance
    }

    /// Returns the recommendations.
    #[must_use]
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// Returns the metadata entries.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, Value> {
        &self.metadata
    }

    /// Returns the response timestamp.
    #[must_use]
    pub const fn responded_at(&self) -> DateTime<Utc> {
        self.responded_at
    }

    /// Scores the response content in `0..=100`.
    ///
    /// A response earns 40 points for existing, 30 for non-blank guidance
    /// and 5 per recommendation up to 30.
    #[must_use]
    pub fn quality_score(&self) -> u8 {
        let guidance_points: u32 = if self.guidance.trim().is_empty() { 0 } else { 30 };
        let recommendation_count = u32::try_from(self.recommendations.len()).unwrap_or(u32::MAX);
        let recommendation_points = recommendation_count.saturating_mul(5).min(30);
        let total = (40 + guidance_points + recommendation_points).min(100);
        u8::try_from(total).unwrap_or(100)
    }
}
