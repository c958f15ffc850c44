//! Command implementations for phantom-lock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, after resolving the configuration and building the
//! lock manager shared by every command.

mod clear;
mod list;
mod run;
mod status;

use crate::cli::{Cli, Command};
use phantom_lock::{Config, LockManager, Result};

/// Dispatch a command to its implementation.
///
/// Returns the process exit code on success.
pub fn dispatch(cli: Cli) -> Result<i32> {
    let config = resolve_config(&cli)?;
    let manager = LockManager::new(&config)?;

    match cli.command {
        Command::Status(args) => status::cmd_status(&manager, args),
        Command::List(args) => list::cmd_list(&manager, args),
        Command::Run(args) => run::cmd_run(&manager, args),
        Command::Clear(args) => clear::cmd_clear(&manager, args),
    }
}

/// Load the configuration file (if given) and apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.lock_root = root.clone();
    }

    if let Some(liveness) = cli.liveness {
        config.liveness = liveness;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use phantom_lock::config::LivenessMode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn root_flag_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "lock_root: /from/file\ntree_dir: tree\n").unwrap();

        let cli = Cli::try_parse_from([
            "phantom-lock",
            "--config",
            config_path.to_str().unwrap(),
            "--root",
            "/from/flag",
            "list",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.lock_root, PathBuf::from("/from/flag"));
        assert_eq!(config.tree_dir, "tree");
    }

    #[test]
    fn liveness_flag_overrides_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        std::fs::write(&config_path, "liveness: process_table\n").unwrap();

        let cli = Cli::try_parse_from([
            "phantom-lock",
            "--config",
            config_path.to_str().unwrap(),
            "--liveness",
            "assume_alive",
            "list",
        ])
        .unwrap();

        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.liveness, LivenessMode::AssumeAlive);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli =
            Cli::try_parse_from(["phantom-lock", "--config", "/no/such/file.yaml", "list"])
                .unwrap();
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn dispatch_status_on_fresh_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("locks");
        let cli = Cli::try_parse_from([
            "phantom-lock",
            "--root",
            root.to_str().unwrap(),
            "status",
            temp_dir.path().to_str().unwrap(),
        ])
        .unwrap();

        assert_eq!(dispatch(cli).unwrap(), phantom_lock::exit_codes::SUCCESS);
        assert!(root.join("pfs").is_dir());
    }
}
