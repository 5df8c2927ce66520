//! Domain types for dependency-ordered loading.

mod error;
mod report;
mod state;

pub use error::{LoadError, ParseLoadingStateError};
pub use report::{LoadingReport, LoadingStatistics, UnloadingReport};
pub use state::LoadingState;
