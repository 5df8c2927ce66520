//! Step definitions for agent start-up scenarios.

mod given;
mod then;
mod when;
pub mod world;
