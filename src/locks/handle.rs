//! Lock handle: acquisition and release of a single marker.

use super::manager::LockManager;
use super::phantom::{children, file_name_of, is_marker_name};
use crate::error::{LockError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// The unit of lock ownership.
///
/// A handle owns zero or one marker. It starts empty, records the marker path
/// on a successful [`acquire`](Self::acquire), and forgets it on
/// [`release`](Self::release). Dropping a handle does **not** release the
/// lock; use [`LockManager::lock`] for scoped ownership.
#[derive(Debug)]
pub struct LockHandle<'m> {
    manager: &'m LockManager,
    marker: Option<PathBuf>,
}

impl<'m> LockHandle<'m> {
    pub(super) fn new(manager: &'m LockManager) -> Self {
        Self {
            manager,
            marker: None,
        }
    }

    /// Path of the owned marker directory, if any.
    pub fn locked_path(&self) -> Option<&Path> {
        self.marker.as_deref()
    }

    /// Try to lock `lock_path` without blocking.
    ///
    /// Markers whose owner is not a live instance of the application are
    /// reaped first. The whole algorithm runs under the global gate, which is
    /// released on every exit path.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The lock is held; `locked_path()` names the marker
    /// * `Err(LockError::GateBusy)` - Another acquisition is running
    /// * `Err(LockError::AlreadyLocked)` - A live owner holds the lock
    /// * `Err(LockError::Io)` - A directory could not be created or listed
    pub fn acquire(&mut self, lock_path: impl AsRef<Path>) -> Result<()> {
        let lock_path = lock_path.as_ref();
        debug!("attempting to lock '{}'", lock_path.display());

        if let Some(held) = &self.marker {
            return Err(LockError::HandleInUse { held: held.clone() });
        }

        let Some(_gate) = self.manager.gate().begin()? else {
            return Err(LockError::GateBusy {
                path: lock_path.to_path_buf(),
            });
        };

        let phantom = self.manager.phantom_path(lock_path)?;
        debug!("phantom path: '{}'", phantom.display());

        if !phantom.exists() {
            fs::create_dir_all(&phantom).map_err(|e| {
                LockError::io(
                    format!("failed to create lock directory '{}'", phantom.display()),
                    e,
                )
            })?;
        }

        let markers: Vec<PathBuf> = children(&phantom)?
            .into_iter()
            .filter(|child| is_marker_name(child))
            .collect();
        let owners: Vec<String> = markers.iter().map(|m| file_name_of(m)).collect();
        let alive = self.manager.oracle().live_owners(&owners);

        for (child, pid) in markers.iter().zip(&owners) {
            if alive.contains(pid) {
                continue;
            }

            debug!("reaping lock from process '{}'", pid);
            // Markers are empty; a non-empty pid-named directory is not ours to remove.
            if let Err(e) = fs::remove_dir(child) {
                warn!("failed to reap stale lock '{}': {}", child.display(), e);
            }
        }

        let remaining = children(&phantom)?;
        debug!("{} lock(s) active on '{}'", remaining.len(), lock_path.display());

        if !remaining.is_empty() {
            return Err(LockError::AlreadyLocked {
                path: lock_path.to_path_buf(),
                owners: remaining.iter().map(|p| file_name_of(p)).collect(),
            });
        }

        let marker = phantom.join(self.manager.process_id());
        fs::create_dir(&marker).map_err(|e| {
            LockError::io(
                format!("failed to create lock marker '{}'", marker.display()),
                e,
            )
        })?;

        debug!(
            "locked '{}' with marker '{}'",
            lock_path.display(),
            marker.display()
        );
        self.marker = Some(marker);
        Ok(())
    }

    /// Release the owned marker and prune empty ancestors up to the tree root.
    ///
    /// Releasing a handle that holds nothing, or whose marker has vanished,
    /// succeeds without side effects. If the marker cannot be removed (for
    /// example because a path below it is locked) it stays recorded and
    /// `Err(LockError::Io)` is returned.
    pub fn release(&mut self) -> Result<()> {
        let Some(marker) = self.marker.clone() else {
            return Ok(());
        };
        debug!("releasing '{}'", marker.display());

        if !marker.exists() {
            self.marker = None;
            return Ok(());
        }

        // Non-recursive: a marker that gained children is the mirror of a
        // path another handle has locked, and must not be removed with it.
        let removed = fs::remove_dir(&marker);

        if let Some(parent) = marker.parent() {
            self.manager.tree().prune_empty_ancestors(parent);
        }

        match removed {
            Ok(()) => {
                self.marker = None;
                Ok(())
            }
            Err(e) => {
                error!("failed to remove lock marker '{}': {}", marker.display(), e);
                Err(LockError::io(
                    format!("failed to remove lock marker '{}'", marker.display()),
                    e,
                ))
            }
        }
    }
}
