//! In-memory agent implementations.

mod static_agent;

pub use static_agent::StaticAgent;
