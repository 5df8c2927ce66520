//! Capability registry for workspace agents.
//!
//! Agents declare capabilities, dependencies on other agents and a version.
//! The registry indexes them by capability, keeps the dependency graph
//! acyclic and guards version compatibility between agents. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The agent port in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The registry service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
