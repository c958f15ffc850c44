//! Liveness oracle backed by a `/proc`-style process table.

use super::LivenessOracle;
use crate::error::{LockError, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Oracle that enumerates the process table and matches executable names.
///
/// Each numeric entry `<proc_root>/<pid>` is resolved through its `exe` link.
/// A pid is considered a live owner only if the link resolves to a file named
/// `image_name`.
#[derive(Debug, Clone)]
pub struct ProcessTableOracle {
    proc_root: PathBuf,
    image_name: String,
}

impl ProcessTableOracle {
    pub fn new(proc_root: impl Into<PathBuf>, image_name: impl Into<String>) -> Self {
        Self {
            proc_root: proc_root.into(),
            image_name: image_name.into(),
        }
    }

    /// The executable name this oracle matches against.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    /// Enumerate the pids of all running instances of the application.
    ///
    /// Entries that disappear or cannot be resolved while scanning are skipped.
    pub fn running_process_ids(&self) -> Result<BTreeSet<String>> {
        let entries = fs::read_dir(&self.proc_root).map_err(|e| {
            LockError::io(
                format!(
                    "failed to read process table '{}'",
                    self.proc_root.display()
                ),
                e,
            )
        })?;

        let mut pids = BTreeSet::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_pid(&name) || !entry.path().is_dir() {
                continue;
            }

            if self.resolves_to_image(&entry.path().join("exe")) {
                pids.insert(name);
            }
        }

        Ok(pids)
    }

    fn resolves_to_image(&self, exe_link: &Path) -> bool {
        let Ok(resolved) = fs::canonicalize(exe_link) else {
            return false;
        };
        resolved
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == self.image_name)
    }
}

impl ProcessTableOracle {
    fn snapshot(&self) -> BTreeSet<String> {
        match self.running_process_ids() {
            Ok(pids) => pids,
            Err(e) => {
                // Treated as "no instances running": the marker will be reaped.
                warn!("{}", e);
                BTreeSet::new()
            }
        }
    }
}

impl LivenessOracle for ProcessTableOracle {
    fn is_owner_alive(&self, pid: &str) -> bool {
        self.snapshot().contains(pid)
    }

    fn live_owners(&self, pids: &[String]) -> BTreeSet<String> {
        if pids.is_empty() {
            return BTreeSet::new();
        }
        let running = self.snapshot();
        pids.iter()
            .filter(|pid| running.contains(pid.as_str()))
            .cloned()
            .collect()
    }
}

/// Whether a directory name looks like a process identifier.
pub(crate) fn is_pid(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit())
}
