//! Agent discovery and request routing.
//!
//! Discovery turns a request into a ranked list of suitable agents and a
//! routing decision. Candidates come from the capability registry, pass
//! context, technology and health filters, and are scored on capability,
//! context fit, recent performance and specialization.
//!
//! - Domain types in [`domain`]
//! - Discovery, routing and monitoring in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
