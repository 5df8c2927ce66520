//! Suitability scoring for discovery candidates.
//!
//! A score is the sum of four parts, clamped to `0..=100`:
//!
//! | part           | range | source                                   |
//! |----------------|-------|------------------------------------------|
//! | capability     | 0–40  | two fifths of the agent's self-rating     |
//! | context        | 0–25  | project and scope fit                     |
//! | performance    | 0–20  | rolling success rate and latency          |
//! | specialization | 5–15  | agent type against request keywords       |

use crate::agent_registry::domain::{AgentMetadata, AgentRequest, AgentType, RegisteredAgent};
use crate::discovery::domain::AgentMetrics;

const CROSS_PROJECT_CONTEXT: u32 = 25;
const PROJECT_CONTEXT: u32 = 20;
const WORKSPACE_CONTEXT: u32 = 15;
const SPECIALIZED: u32 = 15;
const GENERALIST: u32 = 5;
const LATENCY_STEP_MS: u64 = 500;

/// Scores `entry` for `request` given its rolling `metrics`.
pub(crate) fn score(entry: &RegisteredAgent, request: &AgentRequest, metrics: &AgentMetrics) -> u32 {
    let capability = capability_points(entry.agent().capability_score(request.capability()));
    let context = context_points(entry.metadata(), request);
    let performance = performance_points(metrics);
    let specialization = specialization_points(entry.metadata().agent_type(), request);
    capability + context + performance + specialization
}

pub(crate) fn capability_points(self_rating: u8) -> u32 {
    (u32::from(self_rating.min(100)) * 2)
        .checked_div(5)
        .unwrap_or_default()
}

pub(crate) fn context_points(metadata: &AgentMetadata, request: &AgentRequest) -> u32 {
    if request.is_cross_project() && metadata.supports_cross_project() {
        CROSS_PROJECT_CONTEXT
    } else if request
        .involved_projects()
        .all(|project| metadata.supports_project(project))
    {
        PROJECT_CONTEXT
    } else if metadata.is_workspace_level() {
        WORKSPACE_CONTEXT
    } else {
        0
    }
}

pub(crate) fn performance_points(metrics: &AgentMetrics) -> u32 {
    let success = metrics.success_permille().checked_div(100).unwrap_or_default();
    let slowness = metrics
        .average_latency_ms()
        .checked_div(LATENCY_STEP_MS)
        .unwrap_or_default();
    let responsiveness = 10_u64.saturating_sub(slowness);
    success.min(10) + u32::try_from(responsiveness).unwrap_or_default()
}

pub(crate) fn specialization_points(agent_type: AgentType, request: &AgentRequest) -> u32 {
    if agent_type == AgentType::WorkspaceCoordination && request.is_cross_project() {
        return SPECIALIZED;
    }
    let request_type = request.request_type().to_lowercase();
    let matches = agent_type
        .specialization_keywords()
        .iter()
        .any(|keyword| request_type.contains(keyword) || request.description_mentions(keyword));
    if matches { SPECIALIZED } else { GENERALIST }
}
