//! Lock listing and operator recovery.

use super::manager::LockManager;
use super::phantom::{children, file_name_of, is_empty_dir, is_marker_name};
use super::types::LockInfo;
use crate::error::{LockError, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

impl LockManager {
    /// List every marker in the phantom tree.
    ///
    /// A marker is an empty, pid-named directory below the tree root. Results
    /// are sorted by target path, then owner.
    pub fn list_locks(&self) -> Result<Vec<LockInfo>> {
        let mut locks = Vec::new();
        let root = self.tree_root();

        for entry in WalkDir::new(root).min_depth(2) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Entries vanish while other processes release locks.
                    debug!("skipping unreadable lock tree entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_dir() || !is_marker_name(path) || !is_empty_dir(path) {
                continue;
            }

            let Some(target) = path.parent().and_then(|dir| self.tree().target_of(dir)) else {
                continue;
            };

            locks.push(LockInfo {
                target,
                marker: path.to_path_buf(),
                owner_pid: file_name_of(path),
                owner_alive: false,
                created_at: created_at(path),
            });
        }

        let owners: Vec<String> = locks.iter().map(|l| l.owner_pid.clone()).collect();
        let alive = self.oracle().live_owners(&owners);
        for lock in &mut locks {
            lock.owner_alive = alive.contains(&lock.owner_pid);
        }

        locks.sort_by(|a, b| {
            a.target
                .cmp(&b.target)
                .then_with(|| a.owner_pid.cmp(&b.owner_pid))
        });

        Ok(locks)
    }

    /// Force-remove every marker for `lock_path`, regardless of owner liveness.
    ///
    /// The caller is responsible for verifying that clearing the lock is
    /// appropriate. Runs under the global gate.
    ///
    /// # Returns
    ///
    /// * `Ok(n)` - Number of markers removed
    /// * `Err(LockError::GateBusy)` - Another acquisition is running
    pub fn clear_lock(&self, lock_path: impl AsRef<Path>) -> Result<usize> {
        let lock_path = lock_path.as_ref();

        let Some(_gate) = self.gate().begin()? else {
            return Err(LockError::GateBusy {
                path: lock_path.to_path_buf(),
            });
        };

        let phantom = self.phantom_path(lock_path)?;
        if !phantom.exists() {
            return Ok(0);
        }

        let mut cleared = 0;
        for child in children(&phantom)? {
            if !is_marker_name(&child) || !is_empty_dir(&child) {
                continue;
            }
            fs::remove_dir(&child).map_err(|e| {
                LockError::io(
                    format!("failed to clear lock marker '{}'", child.display()),
                    e,
                )
            })?;
            cleared += 1;
        }

        self.tree().prune_empty_ancestors(&phantom);
        Ok(cleared)
    }

    /// Force-remove the global gate marker.
    ///
    /// Only needed when a process died in the middle of an acquisition and
    /// left the gate behind. Returns whether a marker was removed.
    pub fn clear_gate(&self) -> Result<bool> {
        let path = self.gate_path();
        if !path.exists() {
            return Ok(false);
        }

        warn!("force-clearing acquisition gate '{}'", path.display());
        fs::remove_dir_all(path).map_err(|e| {
            LockError::io(format!("failed to clear gate '{}'", path.display()), e)
        })?;
        Ok(true)
    }
}

fn created_at(path: &Path) -> Option<DateTime<Utc>> {
    let metadata = fs::metadata(path).ok()?;
    let time = metadata.created().or_else(|_| metadata.modified()).ok()?;
    Some(DateTime::<Utc>::from(time))
}
