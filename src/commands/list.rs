//! Implementation of the `phantom-lock list` command.

use crate::cli::ListArgs;
use phantom_lock::{LockError, LockManager, Result, exit_codes};

/// Execute the `phantom-lock list` command.
pub fn cmd_list(manager: &LockManager, args: ListArgs) -> Result<i32> {
    let locks = manager.list_locks()?;

    if args.json {
        let json = serde_json::to_string_pretty(&locks)
            .map_err(|e| LockError::Command(format!("failed to serialize locks: {}", e)))?;
        println!("{}", json);
        return Ok(exit_codes::SUCCESS);
    }

    if manager.gate_held() {
        println!(
            "Acquisition gate is held: {}",
            manager.gate_path().display()
        );
        println!();
    }

    if locks.is_empty() {
        println!("No active locks.");
        return Ok(exit_codes::SUCCESS);
    }

    println!("Active locks ({}):", locks.len());
    println!();

    for lock in &locks {
        println!("  {}:", lock.target.display());
        println!("    PID:        {}", lock.owner_pid);
        if let Some(created_at) = lock.created_at {
            println!("    Created:    {}", created_at.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        println!("    Age:        {}", lock.age_string());
        if !lock.owner_alive {
            println!("    Status:     STALE (owner is not running)");
        }
        println!("    Marker:     {}", lock.marker.display());
        println!();
    }

    // Summary
    let stale_count = locks.iter().filter(|l| !l.owner_alive).count();
    if stale_count > 0 {
        println!(
            "{} stale lock(s) will be reaped by the next acquisition of their path.",
            stale_count
        );
    }

    Ok(exit_codes::SUCCESS)
}
