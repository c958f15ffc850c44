//! Error types for phantom-lock.
//!
//! Uses thiserror for derive macros. Contention failures (`GateBusy`,
//! `AlreadyLocked`) are distinct from I/O failures so callers can decide
//! whether to retry.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for locking operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// Another local acquisition attempt currently holds the global gate.
    #[error("could not lock '{}': another lock acquisition is in progress", .path.display())]
    GateBusy { path: PathBuf },

    /// A live owner still holds the lock after stale markers were reaped.
    #[error("could not lock '{}': held by process {}", .path.display(), .owners.join(", "))]
    AlreadyLocked { path: PathBuf, owners: Vec<String> },

    /// The handle already owns a marker and must be released first.
    #[error("lock handle already holds '{}'", .held.display())]
    HandleInUse { held: PathBuf },

    /// The path cannot be mirrored into the phantom tree.
    #[error("cannot lock '{}': {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    /// A filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A CLI command could not be carried out.
    #[error("{0}")]
    Command(String),
}

impl LockError {
    /// Wrap an I/O error with a description of what was being attempted.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        LockError::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the failure was caused by another lock holder rather than a fault.
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            LockError::GateBusy { .. } | LockError::AlreadyLocked { .. }
        )
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::GateBusy { .. } | LockError::AlreadyLocked { .. } => {
                exit_codes::LOCK_FAILURE
            }
            LockError::HandleInUse { .. } | LockError::InvalidPath { .. } => {
                exit_codes::USER_ERROR
            }
            LockError::Io { .. } => exit_codes::IO_FAILURE,
            LockError::Config(_) | LockError::Command(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for locking operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn contention_errors_map_to_lock_failure() {
        let busy = LockError::GateBusy {
            path: PathBuf::from("/tmp"),
        };
        let held = LockError::AlreadyLocked {
            path: PathBuf::from("/tmp"),
            owners: vec!["42".to_string()],
        };

        assert!(busy.is_contention());
        assert!(held.is_contention());
        assert_eq!(busy.exit_code(), exit_codes::LOCK_FAILURE);
        assert_eq!(held.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn io_error_has_correct_exit_code() {
        let err = LockError::io(
            "failed to create marker",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_contention());
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LockError::GateBusy {
            path: PathBuf::from("/tmp/project"),
        };
        assert_eq!(
            err.to_string(),
            "could not lock '/tmp/project': another lock acquisition is in progress"
        );

        let err = LockError::AlreadyLocked {
            path: PathBuf::from("/tmp/project"),
            owners: vec!["100".to_string(), "200".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "could not lock '/tmp/project': held by process 100, 200"
        );

        let err = LockError::io(
            "failed to list '/x'",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.to_string(), "failed to list '/x': gone");
    }
}
