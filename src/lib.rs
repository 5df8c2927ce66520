//! Switchyard: capability-based coordination for workspace agents.
//!
//! This crate registers workspace agents by capability, routes requests to
//! the agents best suited to answer them, and brings agents online and
//! offline in dependency order.
//!
//! # Architecture
//!
//! Switchyard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure coordination rules with no runtime dependencies
//! - **Ports**: The [`agent_registry::ports::WorkspaceAgent`] trait agents
//!   implement
//! - **Adapters**: Concrete agents, such as the scriptable in-memory agent
//! - **Services**: Registry, discovery, dispatch and loading orchestration
//!
//! # Modules
//!
//! - [`agent_registry`]: Agent registration, capability index and dependency graph
//! - [`discovery`]: Candidate filtering, scoring, routing and performance metrics
//! - [`dispatch`]: Timed execution of routing decisions
//! - [`loader`]: Dependency-ordered, deduplicated agent loading
//! - [`config`]: Aggregated settings for every component

pub mod agent_registry;
pub mod config;
pub mod discovery;
pub mod dispatch;
pub mod loader;
