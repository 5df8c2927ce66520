//! Unit tests for the agent registry module.
//!
//! Tests are organised by layer: value types, the dependency graph and the
//! registry service.

mod fixtures;
