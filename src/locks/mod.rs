//! Locking subsystem for phantom-lock.
//!
//! This module implements advisory, cross-process locking of filesystem paths
//! using nothing but directory creation and removal.
//!
//! # Layout
//!
//! The lock root (see [`Config`](crate::config::Config)) holds two entries:
//! - `lock/`: the global acquisition gate, present while an acquisition runs
//! - `pfs/`: the phantom tree, mirroring locked paths
//!
//! Locking `/home/me/project` creates `pfs/home/me/project/<pid>/`. The pid
//! directory (the *marker*) is the only witness of ownership.
//!
//! # Stale Locks
//!
//! Markers left by crashed processes are reaped by the next acquisition of the
//! same path, once the liveness oracle reports their owner is not a live
//! instance of the application.
//!
//! # RAII Guards
//!
//! [`LockHandle`] gives explicit acquire/release control. [`HeldLock`] releases
//! when dropped; if release fails, a warning is logged but the program does not
//! crash.

mod gate;
mod guard;
mod handle;
mod manager;
mod operations;
mod phantom;
mod types;


// Re-export public API
pub use gate::{AcquisitionGate, GateGuard};
pub use guard::HeldLock;
pub use handle::LockHandle;
pub use manager::LockManager;
pub use phantom::PhantomTree;
pub use types::LockInfo;
