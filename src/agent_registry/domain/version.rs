//! Agent version values and compatibility rules.

use super::AgentDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Dot-separated numeric agent version such as `1`, `2.4` or `1.0.3`.
///
/// Two versions are compatible when their major components are equal.
/// Ordering compares components numerically; missing trailing components
/// count as zero, so `1.2` and `1.2.0` compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentVersion {
    raw: String,
    components: Vec<u64>,
}

impl AgentVersion {
    /// Parses a version string.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyVersion`] when the value is blank and
    /// [`AgentDomainError::InvalidVersion`] when any component is not a
    /// non-negative integer.
    pub fn new(value: impl Into<String>) -> Result<Self, AgentDomainError> {
        let raw_value = value.into();
        let raw = raw_value.trim().to_owned();
        if raw.is_empty() {
            return Err(AgentDomainError::EmptyVersion);
        }

        let components = raw
            .split('.')
            .map(|part| {
                if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                    return Err(AgentDomainError::InvalidVersion(raw_value.clone()));
                }
                part.parse::<u64>()
                    .map_err(|_| AgentDomainError::InvalidVersion(raw_value.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { raw, components })
    }

    /// Returns the major component.
    #[must_use]
    pub fn major(&self) -> u64 {
        self.components.first().copied().unwrap_or_default()
    }

    /// Returns the version as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns whether this installed version satisfies `required`.
    #[must_use]
    pub fn is_compatible_with(&self, required: &Self) -> bool {
        self.major() == required.major()
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or_default()
    }
}

impl PartialEq for AgentVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AgentVersion {}

impl PartialOrd for AgentVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AgentVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let width = self.components.len().max(other.components.len());
        (0..width)
            .map(|index| self.component(index).cmp(&other.component(index)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for AgentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<String> for AgentVersion {
    type Error = AgentDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AgentVersion> for String {
    fn from(value: AgentVersion) -> Self {
        value.raw
    }
}

/// A version together with the time it was recorded in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    version: AgentVersion,
    recorded_at: DateTime<Utc>,
}

impl VersionRecord {
    /// Creates a version record.
    #[must_use]
    pub const fn new(version: AgentVersion, recorded_at: DateTime<Utc>) -> Self {
        Self {
            version,
            recorded_at,
        }
    }

    /// Returns the recorded version.
    #[must_use]
    pub const fn version(&self) -> &AgentVersion {
        &self.version
    }

    /// Returns when the version was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
