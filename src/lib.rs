//! phantom-lock: advisory cross-process locking for filesystem paths.
//!
//! Locks are expressed purely as directories: locking `/a/b` creates a
//! pid-named marker directory under `<lock root>/pfs/a/b/`, and a single
//! gate directory serializes acquisitions between local processes. No
//! platform locking primitive (flock, byte-range locks, named mutexes) is
//! involved.
//!
//! ```no_run
//! use phantom_lock::{Config, LockManager};
//!
//! let manager = LockManager::new(&Config::default())?;
//! let mut handle = manager.handle();
//! handle.acquire("/home/me/project")?;
//! // ... mutate the project ...
//! handle.release()?;
//! # Ok::<(), phantom_lock::LockError>(())
//! ```

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod liveness;
pub mod locks;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use error::{LockError, Result};
pub use liveness::LivenessOracle;
pub use locks::{HeldLock, LockHandle, LockInfo, LockManager};
