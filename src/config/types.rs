//! Configuration types and defaults for phantom-lock.
//!
//! This module defines enums and default value functions used by the
//! Config struct.

use crate::error::LockError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// How lock owners are checked for liveness during reaping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LivenessMode {
    /// Use the process table when the platform exposes one, otherwise assume alive.
    #[default]
    Auto,
    /// Always enumerate the process table.
    ProcessTable,
    /// Never treat a marker as stale.
    AssumeAlive,
}

impl FromStr for LivenessMode {
    type Err = LockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "process_table" => Ok(Self::ProcessTable),
            "assume_alive" => Ok(Self::AssumeAlive),
            other => Err(LockError::Config(format!(
                "unknown liveness mode '{}' (expected auto, process_table or assume_alive)",
                other
            ))),
        }
    }
}

// ============================================================================
// Default value functions
// ============================================================================

pub(crate) fn default_lock_root() -> PathBuf {
    std::env::temp_dir().join("phantom-locks")
}

pub(crate) fn default_gate_dir() -> String {
    "lock".to_string()
}

pub(crate) fn default_tree_dir() -> String {
    "pfs".to_string()
}

pub(crate) fn default_proc_root() -> PathBuf {
    PathBuf::from("/proc")
}
