//! Discovery, scoring, routing and performance tracking services.

mod discovery;
mod monitor;
mod routing;
pub(crate) mod scoring;

pub use discovery::DiscoveryService;
pub use monitor::PerformanceMonitor;
pub use routing::RoutingEngine;
