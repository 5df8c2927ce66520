//! Adapter implementations for the agent port.

pub mod memory;
