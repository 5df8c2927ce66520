//! Application services for the capability registry.

mod registry;

pub use registry::{
    CapabilityRegistry, RECENT_EVENT_LIMIT, RegistrationEvent, RegistrationEventKind,
    RegistryError, RegistryResult, RegistryStatistics, VersionUpdate,
};
