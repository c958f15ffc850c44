//! Exit code constants for the phantom-lock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config, refused operation)
//! - 3: Filesystem failure
//! - 4: Lock contention (path already locked, or gate busy)
//! - 128: The child started by `run` was terminated by a signal
//!
//! Otherwise `run` exits with the child's own exit code.

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or refused operation.
pub const USER_ERROR: i32 = 1;

/// Filesystem failure while creating, listing, or removing lock directories.
pub const IO_FAILURE: i32 = 3;

/// Lock acquisition failure: the path is held, or another acquisition is running.
pub const LOCK_FAILURE: i32 = 4;

/// The child started by `run` exited without a status code.
pub const CHILD_SIGNALED: i32 = 128;
