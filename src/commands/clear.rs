//! Implementation of the `phantom-lock clear` command.

use crate::cli::ClearArgs;
use phantom_lock::{LockError, LockManager, Result, exit_codes};

/// Execute the `phantom-lock clear` command.
///
/// Requires `--force`: clearing a lock whose holder is still running breaks
/// mutual exclusion for that path.
pub fn cmd_clear(manager: &LockManager, args: ClearArgs) -> Result<i32> {
    let target = match &args.path {
        Some(path) => path.display().to_string(),
        None => "--gate".to_string(),
    };

    if !args.force {
        return Err(LockError::Command(format!(
            "refusing to clear lock without --force flag.\n\n\
             Clearing locks can cause data corruption if the lock holder is still active.\n\
             Only clear locks if you are certain the lock holder has crashed.\n\n\
             To clear the lock, run:\n  phantom-lock clear {} --force",
            target
        )));
    }

    if args.gate {
        if manager.clear_gate()? {
            println!("Cleared acquisition gate: {}", manager.gate_path().display());
        } else {
            println!("Acquisition gate is not held.");
        }
        return Ok(exit_codes::SUCCESS);
    }

    let Some(path) = &args.path else {
        return Err(LockError::Command(
            "clear needs a path or --gate".to_string(),
        ));
    };

    let cleared = manager.clear_lock(path)?;
    if cleared == 0 {
        println!("No locks on {}.", path.display());
    } else {
        println!("Cleared {} lock(s) on {}.", cleared, path.display());
    }

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phantom_lock::Config;
    use phantom_lock::liveness::AssumeAlive;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn manager(temp_dir: &TempDir) -> LockManager {
        let config = Config {
            lock_root: temp_dir.path().join("locks"),
            ..Config::default()
        };
        LockManager::with_oracle(&config, Box::new(AssumeAlive)).unwrap()
    }

    #[test]
    fn refuses_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);
        let path = temp_dir.path().join("project");
        let _held = manager.lock(&path).unwrap();

        let err = cmd_clear(
            &manager,
            ClearArgs {
                path: Some(path.clone()),
                gate: false,
                force: false,
            },
        )
        .unwrap_err();

        assert!(err.to_string().contains("--force"));
        assert!(manager.is_locked(&path));
    }

    #[test]
    fn clears_path_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);
        let path = temp_dir.path().join("project");
        let mut handle = manager.handle();
        handle.acquire(&path).unwrap();

        let code = cmd_clear(
            &manager,
            ClearArgs {
                path: Some(path.clone()),
                gate: false,
                force: true,
            },
        )
        .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        assert!(!manager.is_locked(&path));
        // The handle notices its marker is gone and releases cleanly.
        handle.release().unwrap();
    }

    #[test]
    fn clears_gate_with_force() {
        let temp_dir = TempDir::new().unwrap();
        let manager = manager(&temp_dir);
        std::fs::create_dir(manager.gate_path()).unwrap();

        cmd_clear(
            &manager,
            ClearArgs {
                path: None::<PathBuf>,
                gate: true,
                force: true,
            },
        )
        .unwrap();

        assert!(!manager.gate_held());
    }
}
