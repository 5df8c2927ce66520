//! Domain types for request dispatch.

mod config;
mod error;
mod outcome;

pub use config::DispatchConfig;
pub use error::DispatchError;
pub use outcome::{AgentReply, DispatchOutcome};
