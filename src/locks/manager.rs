//! Lock manager: the explicit replacement for process-wide lock state.

use super::gate::AcquisitionGate;
use super::guard::HeldLock;
use super::handle::LockHandle;
use super::phantom::PhantomTree;
use crate::config::Config;
use crate::error::{LockError, Result};
use crate::liveness::{self, LivenessOracle};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Owns the lock root layout and the liveness oracle.
///
/// Construct one per process and pass it by reference to call sites. The
/// lock root and tree root are created on construction and the root is
/// canonicalized so marker paths compare reliably during pruning.
pub struct LockManager {
    tree: PhantomTree,
    gate: AcquisitionGate,
    oracle: Box<dyn LivenessOracle>,
    process_id: String,
}

impl LockManager {
    /// Create a manager using the oracle selected by `config.liveness`.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_oracle(config, liveness::from_config(config))
    }

    /// Create a manager with an explicit liveness oracle.
    pub fn with_oracle(config: &Config, oracle: Box<dyn LivenessOracle>) -> Result<Self> {
        config.validate()?;

        fs::create_dir_all(&config.lock_root).map_err(|e| {
            LockError::io(
                format!(
                    "failed to create lock root '{}'",
                    config.lock_root.display()
                ),
                e,
            )
        })?;
        let lock_root = fs::canonicalize(&config.lock_root).map_err(|e| {
            LockError::io(
                format!(
                    "failed to resolve lock root '{}'",
                    config.lock_root.display()
                ),
                e,
            )
        })?;

        let resolved = Config {
            lock_root,
            ..config.clone()
        };

        let tree_root = resolved.tree_root();
        fs::create_dir_all(&tree_root).map_err(|e| {
            LockError::io(
                format!("failed to create lock tree '{}'", tree_root.display()),
                e,
            )
        })?;

        Ok(Self {
            tree: PhantomTree::new(tree_root),
            gate: AcquisitionGate::new(resolved.gate_path()),
            oracle,
            process_id: std::process::id().to_string(),
        })
    }

    /// Start an empty lock handle.
    pub fn handle(&self) -> LockHandle<'_> {
        LockHandle::new(self)
    }

    /// Acquire `lock_path` and release it when the returned guard is dropped.
    pub fn lock(&self, lock_path: impl AsRef<Path>) -> Result<HeldLock<'_>> {
        let mut handle = self.handle();
        handle.acquire(lock_path)?;
        Ok(HeldLock::new(handle))
    }

    /// Whether `lock_path` appears locked.
    ///
    /// Reads the mirror directory without taking the gate or reaping, so the
    /// answer is approximate under concurrent acquisitions.
    pub fn is_locked(&self, lock_path: impl AsRef<Path>) -> bool {
        self.tree.is_locked(lock_path.as_ref())
    }

    /// Mirror directory of `lock_path` inside the phantom tree.
    pub fn phantom_path(&self, lock_path: impl AsRef<Path>) -> Result<PathBuf> {
        self.tree.phantom_path(lock_path.as_ref())
    }

    /// Root of the phantom tree.
    pub fn tree_root(&self) -> &Path {
        self.tree.root()
    }

    /// Path of the global gate marker.
    pub fn gate_path(&self) -> &Path {
        self.gate.path()
    }

    /// Name given to markers created by this process.
    pub fn process_id(&self) -> &str {
        &self.process_id
    }

    /// Whether the global gate marker currently exists.
    pub fn gate_held(&self) -> bool {
        self.gate.is_held()
    }

    pub(crate) fn tree(&self) -> &PhantomTree {
        &self.tree
    }

    pub(crate) fn gate(&self) -> &AcquisitionGate {
        &self.gate
    }

    pub(crate) fn oracle(&self) -> &dyn LivenessOracle {
        self.oracle.as_ref()
    }
}

impl fmt::Debug for LockManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockManager")
            .field("tree", &self.tree)
            .field("gate", &self.gate)
            .field("process_id", &self.process_id)
            .finish_non_exhaustive()
    }
}
