//! Implementation of the `phantom-lock status` command.

use crate::cli::StatusArgs;
use phantom_lock::{LockManager, Result, exit_codes};
use serde_json::json;

/// Execute the `phantom-lock status` command.
///
/// Prints `locked` or `unlocked`. The check does not reap stale markers.
pub fn cmd_status(manager: &LockManager, args: StatusArgs) -> Result<i32> {
    let locked = manager.is_locked(&args.path);

    if args.json {
        let report = json!({
            "path": args.path,
            "locked": locked,
        });
        println!("{}", report);
    } else if locked {
        println!("{}: locked", args.path.display());
    } else {
        println!("{}: unlocked", args.path.display());
    }

    Ok(exit_codes::SUCCESS)
}
