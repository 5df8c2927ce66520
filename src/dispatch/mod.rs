//! Request dispatch: executing routing decisions.
//!
//! The dispatcher asks discovery where a request should go, calls the
//! chosen agents under a timeout and feeds every outcome back into the
//! performance monitor that discovery reads.
//!
//! - Settings, outcomes and errors in [`domain`]
//! - The dispatcher in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
