//! Process liveness checks for lock reaping.
//!
//! A marker directory is named after the pid of the process that created it.
//! Before a marker is trusted it is checked against a [`LivenessOracle`],
//! which answers whether that pid belongs to a live instance of *our*
//! application. Matching the executable image (not just pid existence) keeps
//! a recycled pid from pinning a lock left behind by a crashed process.
//!
//! # Platforms
//!
//! - **Linux**: [`ProcessTableOracle`] enumerates `/proc` and resolves each
//!   `exe` link to its executable name.
//! - **Elsewhere**: [`AssumeAlive`] never reports a marker as stale. Locks
//!   leaked by crashed processes stay until cleared by an operator.

mod proc_table;

pub use proc_table::ProcessTableOracle;
pub(crate) use proc_table::is_pid;

use crate::config::{Config, LivenessMode};
use std::collections::BTreeSet;
use tracing::warn;

/// Answers whether a marker owner is a live instance of the application.
pub trait LivenessOracle: Send + Sync {
    /// Returns `true` if `pid` identifies a running instance of the application.
    fn is_owner_alive(&self, pid: &str) -> bool;

    /// The subset of `pids` that are live owners.
    ///
    /// Oracles with an expensive lookup should answer the whole batch from a
    /// single snapshot.
    fn live_owners(&self, pids: &[String]) -> BTreeSet<String> {
        pids.iter()
            .filter(|pid| self.is_owner_alive(pid))
            .cloned()
            .collect()
    }
}

/// Oracle that treats every owner as alive, so nothing is ever reaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeAlive;

impl LivenessOracle for AssumeAlive {
    fn is_owner_alive(&self, _pid: &str) -> bool {
        true
    }
}

impl<F> LivenessOracle for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_owner_alive(&self, pid: &str) -> bool {
        self(pid)
    }
}

/// Whether this platform exposes a process table that is cheap to enumerate.
pub fn has_process_table() -> bool {
    cfg!(any(target_os = "linux", target_os = "android"))
}

/// Executable file name of the current process, if it can be determined.
pub fn current_image_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    let exe = std::fs::canonicalize(&exe).unwrap_or(exe);
    exe.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Select the oracle described by the configuration.
pub fn from_config(config: &Config) -> Box<dyn LivenessOracle> {
    let use_table = match config.liveness {
        LivenessMode::AssumeAlive => false,
        LivenessMode::ProcessTable => true,
        LivenessMode::Auto => has_process_table(),
    };

    if !use_table {
        return Box::new(AssumeAlive);
    }

    match config.process_name.clone().or_else(current_image_name) {
        Some(image_name) => Box::new(ProcessTableOracle::new(&config.proc_root, image_name)),
        None => {
            warn!("could not determine executable name; stale locks will not be reaped");
            Box::new(AssumeAlive)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_alive_never_reaps() {
        assert!(AssumeAlive.is_owner_alive("1"));
        assert!(AssumeAlive.is_owner_alive("not-a-pid"));
    }

    #[test]
    fn closures_act_as_oracles() {
        let oracle = |pid: &str| pid == "7";
        assert!(oracle.is_owner_alive("7"));
        assert!(!oracle.is_owner_alive("8"));

        let pids = vec!["7".to_string(), "8".to_string()];
        assert_eq!(oracle.live_owners(&pids), BTreeSet::from(["7".to_string()]));
    }

    #[test]
    fn current_image_name_is_known() {
        let name = current_image_name().unwrap();
        assert!(!name.is_empty());
    }

    #[test]
    fn assume_alive_mode_selects_assume_alive() {
        let config = Config {
            liveness: LivenessMode::AssumeAlive,
            process_name: Some("nothing-runs-this".to_string()),
            ..Config::default()
        };
        let oracle = from_config(&config);
        assert!(oracle.is_owner_alive(&std::process::id().to_string()));
    }

    #[test]
    fn process_table_mode_with_missing_table_reaps_everything() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = Config {
            liveness: LivenessMode::ProcessTable,
            proc_root: temp_dir.path().join("no-such-proc"),
            process_name: Some("app".to_string()),
            ..Config::default()
        };
        let oracle = from_config(&config);
        assert!(!oracle.is_owner_alive("1"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn auto_mode_recognizes_current_process() {
        let oracle = from_config(&Config::default());
        assert!(oracle.is_owner_alive(&std::process::id().to_string()));
    }
}
