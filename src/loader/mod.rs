//! Dependency-ordered bring-up and tear-down of registered agents.
//!
//! The loader walks the registry's dependency graph so that every agent
//! starts after the agents it depends on and stops before them. Concurrent
//! requests to load the same agent share one execution.
//!
//! - Loading states, reports and errors in [`domain`]
//! - The loader service in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
