//! RAII lock guard implementation.

use super::handle::LockHandle;
use crate::error::Result;
use std::path::Path;
use tracing::warn;

/// RAII guard for an acquired lock.
///
/// When dropped, the lock is released. If release fails, a warning is logged
/// but no panic occurs.
#[derive(Debug)]
pub struct HeldLock<'m> {
    handle: LockHandle<'m>,
}

impl<'m> HeldLock<'m> {
    pub(super) fn new(handle: LockHandle<'m>) -> Self {
        Self { handle }
    }

    /// Path of the marker directory backing this lock.
    pub fn marker_path(&self) -> Option<&Path> {
        self.handle.locked_path()
    }

    /// Manually release the lock.
    ///
    /// This is useful when you want to release the lock before the guard
    /// goes out of scope, and want to handle errors explicitly.
    pub fn release(mut self) -> Result<()> {
        self.handle.release()
    }
}

impl Drop for HeldLock<'_> {
    fn drop(&mut self) {
        if let Some(marker) = self.handle.locked_path().map(Path::to_path_buf)
            && let Err(e) = self.handle.release()
        {
            warn!("failed to release lock '{}': {}", marker.display(), e);
        }
    }
}
