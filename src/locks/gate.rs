//! Global acquisition gate.
//!
//! A single marker directory serializes the acquisition algorithm across every
//! local process and thread. The gate only guards the multi-step acquisition;
//! it is not itself the lock on any target path.

use crate::error::{LockError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The global gate marker directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionGate {
    path: PathBuf,
}

impl AcquisitionGate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the gate marker directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether some acquisition currently holds the gate.
    pub fn is_held(&self) -> bool {
        self.path.exists()
    }

    /// Try to take the gate.
    ///
    /// Returns `Ok(None)` when the gate is already held. The marker is created
    /// with a non-recursive `mkdir`, so two callers that both pass the
    /// existence check cannot both create it.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(GateGuard))` - The gate is held until the guard is dropped
    /// * `Ok(None)` - Another acquisition holds the gate
    /// * `Err(LockError::Io)` - The marker could not be created
    pub fn begin(&self) -> Result<Option<GateGuard<'_>>> {
        if self.path.exists() {
            debug!("gate '{}' is busy", self.path.display());
            return Ok(None);
        }

        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                LockError::io(
                    format!("failed to create lock root '{}'", parent.display()),
                    e,
                )
            })?;
        }

        match fs::create_dir(&self.path) {
            Ok(()) => Ok(Some(GateGuard { gate: self })),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!("lost race for gate '{}'", self.path.display());
                Ok(None)
            }
            Err(e) => Err(LockError::io(
                format!("failed to create gate '{}'", self.path.display()),
                e,
            )),
        }
    }

    /// Release the gate.
    ///
    /// Returns whether a marker was removed. Failures are logged, never returned:
    /// this runs during cleanup on paths that may already be failing.
    pub fn end(&self) -> bool {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                warn!("failed to release gate '{}': {}", self.path.display(), e);
                false
            }
        }
    }
}

/// RAII guard for the acquisition gate.
///
/// When dropped, the gate marker is removed, whichever way the scope exits.
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a AcquisitionGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.end();
    }
}
