//! Per-agent loading lifecycle.

use super::ParseLoadingStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loading lifecycle state of one agent.
///
/// `NotLoaded → Loading → Loaded | Failed` on the way up and
/// `Loaded → Unloading → NotLoaded` on the way down. A [`Self::Failed`]
/// record is cleared back to [`Self::NotLoaded`] when the agent is swept
/// by an unload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    /// The agent has not been loaded.
    #[default]
    NotLoaded,
    /// The agent or one of its dependencies is being loaded.
    Loading,
    /// The agent and all of its dependencies are loaded.
    Loaded,
    /// Loading the agent failed.
    Failed,
    /// The agent is being unloaded.
    Unloading,
}

impl LoadingState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotLoaded => "not_loaded",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
            Self::Unloading => "unloading",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::NotLoaded, Self::Loading)
                | (Self::Loading, Self::Loaded | Self::Failed)
                | (Self::Loaded, Self::Unloading)
                | (Self::Unloading | Self::Failed, Self::NotLoaded)
        )
    }
}

impl fmt::Display for LoadingState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LoadingState {
    type Error = ParseLoadingStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_loaded" => Ok(Self::NotLoaded),
            "loading" => Ok(Self::Loading),
            "loaded" => Ok(Self::Loaded),
            "failed" => Ok(Self::Failed),
            "unloading" => Ok(Self::Unloading),
            _ => Err(ParseLoadingStateError(value.to_owned())),
        }
    }
}
