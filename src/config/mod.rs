//! Configuration model for phantom-lock.
//!
//! This module defines the Config struct that describes where the lock root
//! lives and how lock owners are checked for liveness. It supports
//! forward-compatible YAML parsing (unknown fields are ignored), sensible
//! defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::LivenessMode;
