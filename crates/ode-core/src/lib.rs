//! ode-core: shared error type, configuration, and region definitions.
//!
//! This crate is the foundational dependency for the other ode-* crates. It
//! carries the unified [`Error`] that request handlers map to HTTP status
//! codes, the TOML-backed [`config::Config`], and the console area codes used
//! by the boot-sector patcher.

pub mod config;
pub mod error;
pub mod region;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use region::PatchRegion;
