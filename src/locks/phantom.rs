//! Phantom lock tree addressing.
//!
//! Every real path `/a/b/c` is mirrored by a directory `<tree>/a/b/c`. Pid-named
//! children of that directory are markers: each one says that the process with
//! that pid holds the lock on the real path.

use crate::error::{LockError, Result};
use crate::liveness::is_pid;
use std::fs;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf, Prefix};
use tracing::debug;

/// The directory subtree that mirrors locked paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhantomTree {
    root: PathBuf,
}

impl PhantomTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the tree. Never removed by pruning.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a real path to its mirror directory inside the tree.
    ///
    /// The path is made absolute against the current directory, `.` and `..`
    /// components are resolved lexically, and the leading root is stripped
    /// before joining onto the tree root. Symlinks are not followed.
    pub fn phantom_path(&self, lock_path: &Path) -> Result<PathBuf> {
        let absolute = std::path::absolute(lock_path).map_err(|e| {
            LockError::io(
                format!(
                    "failed to resolve absolute path for '{}'",
                    lock_path.display()
                ),
                e,
            )
        })?;

        let mut relative = PathBuf::new();
        for component in absolute.components() {
            match component {
                Component::Prefix(prefix) => relative.push(prefix_dir_name(prefix.kind())),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir => {
                    relative.pop();
                }
                Component::Normal(part) => relative.push(part),
            }
        }

        if relative.as_os_str().is_empty() {
            return Err(LockError::InvalidPath {
                path: lock_path.to_path_buf(),
                reason: "the filesystem root cannot be locked".to_string(),
            });
        }

        Ok(self.root.join(relative))
    }

    /// Recover the real path mirrored by a directory inside the tree.
    pub fn target_of(&self, phantom_dir: &Path) -> Option<PathBuf> {
        let relative = phantom_dir.strip_prefix(&self.root).ok()?;
        Some(Path::new(MAIN_SEPARATOR_STR).join(relative))
    }

    /// Whether `lock_path` currently has any entry in its mirror directory.
    ///
    /// No reaping is done, so a marker left by a dead process still counts.
    pub fn is_locked(&self, lock_path: &Path) -> bool {
        match self.phantom_path(lock_path) {
            Ok(phantom) => phantom.is_dir() && !is_empty_dir(&phantom),
            Err(_) => false,
        }
    }

    /// Remove empty directories from `start` upward, stopping at the tree root.
    ///
    /// Pruning also stops at a pid-named directory: an empty one may be the
    /// marker of another handle whose nested lock was just released.
    pub fn prune_empty_ancestors(&self, start: &Path) {
        let mut current = Some(start);
        while let Some(dir) = current {
            if dir == self.root || !dir.starts_with(&self.root) || is_marker_name(dir) {
                break;
            }

            if dir.exists() {
                if !is_empty_dir(dir) {
                    break;
                }
                if let Err(e) = fs::remove_dir(dir) {
                    // Someone else may have just claimed this subtree.
                    debug!("stopped pruning at '{}': {}", dir.display(), e);
                    break;
                }
            }

            current = dir.parent();
        }
    }
}

/// List the direct children of `dir`, sorted by path.
pub(crate) fn children(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        LockError::io(
            format!("failed to read lock directory '{}'", dir.display()),
            e,
        )
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            LockError::io(
                format!("failed to read entry of lock directory '{}'", dir.display()),
                e,
            )
        })?;
        paths.push(entry.path());
    }

    paths.sort();
    Ok(paths)
}

/// File name of `path` as an owned string (lossy).
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Whether `path` is named like a marker (a process id).
pub(crate) fn is_marker_name(path: &Path) -> bool {
    is_pid(&file_name_of(path))
}

pub(crate) fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

fn prefix_dir_name(prefix: Prefix<'_>) -> String {
    match prefix {
        Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) => {
            (letter as char).to_ascii_uppercase().to_string()
        }
        Prefix::UNC(server, share) | Prefix::VerbatimUNC(server, share) => format!(
            "unc-{}-{}",
            server.to_string_lossy(),
            share.to_string_lossy()
        ),
        Prefix::Verbatim(part) | Prefix::DeviceNS(part) => {
            format!("dev-{}", part.to_string_lossy())
        }
    }
}
