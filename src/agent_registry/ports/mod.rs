//! Port contracts for the agent registry.
//!
//! The agent port is the seam between the coordination core and the
//! workers it routes requests to.

pub mod agent;

pub use agent::{AgentError, AgentErrorKind, AgentHandle, AgentResult, WorkspaceAgent};
