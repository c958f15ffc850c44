//! CLI argument parsing for phantom-lock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{ArgAction, Parser, Subcommand};
use phantom_lock::config::LivenessMode;
use std::path::PathBuf;

/// phantom-lock: advisory cross-process locks on filesystem paths.
///
/// Locks are recorded as pid-named directories in a phantom tree that
/// mirrors the locked paths. Locks left by crashed processes are reaped
/// on the next acquisition.
#[derive(Parser, Debug)]
#[command(name = "phantom-lock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the lock root directory.
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Override how lock owners are checked (auto, process_table, assume_alive).
    #[arg(long, global = true)]
    pub liveness: Option<LivenessMode>,

    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for phantom-lock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report whether a path is locked.
    ///
    /// This is a cheap, approximate check: markers left by dead processes
    /// still count until the next acquisition reaps them.
    Status(StatusArgs),

    /// List every lock marker with its owner and age.
    List(ListArgs),

    /// Run a command while holding the lock on a path.
    ///
    /// Exits with the command's exit code.
    Run(RunArgs),

    /// Force-remove the markers for a path, or a wedged acquisition gate.
    ///
    /// Requires --force flag to prevent accidental clearing.
    Clear(ClearArgs),
}

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Path to check.
    pub path: PathBuf,

    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to lock.
    pub path: PathBuf,

    /// Keep retrying for up to this many seconds while the path is locked.
    #[arg(long, default_value_t = 0)]
    pub wait_secs: u64,

    /// Delay between retries in milliseconds.
    #[arg(long, default_value_t = 250)]
    pub poll_ms: u64,

    /// Command given as a single shell-style string.
    #[arg(short = 'c', long = "shell-command", conflicts_with = "command")]
    pub shell_command: Option<String>,

    /// Command and arguments to run (after `--`).
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Arguments for the `clear` command.
#[derive(Parser, Debug)]
pub struct ClearArgs {
    /// Path whose markers should be cleared.
    #[arg(required_unless_present = "gate", conflicts_with = "gate")]
    pub path: Option<PathBuf>,

    /// Clear the global acquisition gate instead of a path.
    #[arg(long)]
    pub gate: bool,

    /// Force clearing the lock (required for safety).
    #[arg(long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_status() {
        let cli = Cli::try_parse_from(["phantom-lock", "status", "/tmp/project"]).unwrap();
        if let Command::Status(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("/tmp/project"));
            assert!(!args.json);
        } else {
            panic!("Expected Status command");
        }
    }

    #[test]
    fn parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "phantom-lock",
            "list",
            "--json",
            "--root",
            "/var/tmp/locks",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/var/tmp/locks")));
        assert_eq!(cli.verbose, 2);
        assert!(cli.liveness.is_none());
        assert!(matches!(cli.command, Command::List(ListArgs { json: true })));
    }

    #[test]
    fn parse_liveness_override() {
        let cli =
            Cli::try_parse_from(["phantom-lock", "--liveness", "assume_alive", "list"]).unwrap();
        assert_eq!(cli.liveness, Some(LivenessMode::AssumeAlive));

        assert!(Cli::try_parse_from(["phantom-lock", "--liveness", "sometimes", "list"]).is_err());
    }

    #[test]
    fn parse_run_with_trailing_command() {
        let cli = Cli::try_parse_from([
            "phantom-lock",
            "run",
            "/tmp/project",
            "--wait-secs",
            "5",
            "--",
            "make",
            "-j4",
            "build",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("/tmp/project"));
            assert_eq!(args.wait_secs, 5);
            assert_eq!(args.poll_ms, 250);
            assert_eq!(args.command, vec!["make", "-j4", "build"]);
            assert!(args.shell_command.is_none());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_run_with_shell_command() {
        let cli = Cli::try_parse_from([
            "phantom-lock",
            "run",
            "/tmp/project",
            "-c",
            "echo 'hello world'",
        ])
        .unwrap();
        if let Command::Run(args) = cli.command {
            assert_eq!(args.shell_command.as_deref(), Some("echo 'hello world'"));
            assert!(args.command.is_empty());
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn parse_clear_path() {
        let cli =
            Cli::try_parse_from(["phantom-lock", "clear", "/tmp/project", "--force"]).unwrap();
        if let Command::Clear(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("/tmp/project")));
            assert!(!args.gate);
            assert!(args.force);
        } else {
            panic!("Expected Clear command");
        }
    }

    #[test]
    fn parse_clear_gate() {
        let cli = Cli::try_parse_from(["phantom-lock", "clear", "--gate"]).unwrap();
        if let Command::Clear(args) = cli.command {
            assert!(args.path.is_none());
            assert!(args.gate);
            assert!(!args.force);
        } else {
            panic!("Expected Clear command");
        }
    }

    #[test]
    fn clear_requires_a_target() {
        assert!(Cli::try_parse_from(["phantom-lock", "clear", "--force"]).is_err());
        assert!(
            Cli::try_parse_from(["phantom-lock", "clear", "/tmp", "--gate", "--force"]).is_err()
        );
    }
}
