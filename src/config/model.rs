//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for a lock manager.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Layout
    // =========================================================================
    /// Base directory holding the gate marker and the phantom tree.
    #[serde(default = "default_lock_root")]
    pub lock_root: PathBuf,

    /// Name of the global gate marker directory inside `lock_root`.
    #[serde(default = "default_gate_dir")]
    pub gate_dir: String,

    /// Name of the phantom tree root directory inside `lock_root`.
    #[serde(default = "default_tree_dir")]
    pub tree_dir: String,

    // =========================================================================
    // Liveness
    // =========================================================================
    /// Executable name identifying our application in the process table.
    /// When unset, the file name of the running executable is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,

    /// How marker owners are checked for liveness.
    #[serde(default)]
    pub liveness: LivenessMode,

    /// Location of the process table.
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_root: default_lock_root(),
            gate_dir: default_gate_dir(),
            tree_dir: default_tree_dir(),
            process_name: None,
            liveness: LivenessMode::default(),
            proc_root: default_proc_root(),
        }
    }
}
