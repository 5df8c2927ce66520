//! Application services for dependency-ordered loading.

mod loader;

pub use loader::{DependencyLoader, LoadFuture};
