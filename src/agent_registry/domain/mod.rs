//! Domain model for the capability registry.
//!
//! Covers agent identity, capabilities, versions, health, the metadata
//! used for discovery and the dependency graph between agents. The
//! request and response values exchanged with agents live here too.

mod agent_type;
mod capability;
mod error;
mod graph;
mod ids;
mod metadata;
mod registration;
mod request;
mod response;
mod status;
mod version;

pub use agent_type::AgentType;
pub use capability::AgentCapability;
pub(crate) use error::join_ids;
pub use error::{
    AgentDomainError, DependencyCycleError, ParseAgentCapabilityError, ParseAgentTypeError,
};
pub use graph::DependencyGraph;
pub use ids::{AgentId, RequestId};
pub use metadata::AgentMetadata;
pub use registration::RegisteredAgent;
pub use request::{AgentRequest, DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY};
pub use response::AgentResponse;
pub use status::AgentStatus;
pub use version::{AgentVersion, VersionRecord};
