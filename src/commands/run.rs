//! Implementation of the `phantom-lock run` command.
//!
//! Acquisition is a single non-blocking attempt; waiting is done here by
//! polling until the wait budget is spent.

use crate::cli::RunArgs;
use phantom_lock::{HeldLock, LockError, LockManager, Result, exit_codes};
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Execute the `phantom-lock run` command.
///
/// Holds the lock on `args.path` for the lifetime of the child command and
/// returns the child's exit code.
pub fn cmd_run(manager: &LockManager, args: RunArgs) -> Result<i32> {
    let argv = command_argv(&args)?;

    let held = acquire_with_wait(
        manager,
        &args.path,
        Duration::from_secs(args.wait_secs),
        Duration::from_millis(args.poll_ms),
    )?;
    info!("holding lock on '{}'", args.path.display());

    let status = Command::new(&argv[0])
        .args(&argv[1..])
        .status()
        .map_err(|e| LockError::Command(format!("failed to run '{}': {}", argv[0], e)))?;

    held.release()?;
    info!("released lock on '{}'", args.path.display());

    Ok(status.code().unwrap_or(exit_codes::CHILD_SIGNALED))
}

/// Resolve the child command from either the trailing args or `-c`.
fn command_argv(args: &RunArgs) -> Result<Vec<String>> {
    let argv = match &args.shell_command {
        Some(command) => shell_words::split(command).map_err(|e| {
            LockError::Command(format!(
                "failed to parse command '{}': {}\n\
                 Fix: check for unmatched quotes or invalid escape sequences.",
                command, e
            ))
        })?,
        None => args.command.clone(),
    };

    if argv.is_empty() {
        return Err(LockError::Command(
            "no command given; pass it after `--` or with -c".to_string(),
        ));
    }

    Ok(argv)
}

/// Retry acquisition on contention until `wait` has elapsed.
fn acquire_with_wait<'m>(
    manager: &'m LockManager,
    path: &Path,
    wait: Duration,
    poll: Duration,
) -> Result<HeldLock<'m>> {
    let deadline = Instant::now() + wait;
    loop {
        match manager.lock(path) {
            Ok(held) => return Ok(held),
            Err(e) if e.is_contention() && Instant::now() < deadline => {
                debug!("{}; retrying in {:?}", e, poll);
                thread::sleep(poll);
            }
            Err(e) => return Err(e),
        }
    }
}
