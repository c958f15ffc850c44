//! Lock information structures.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Information about a marker found in the phantom tree.
#[derive(Debug, Clone, Serialize)]
pub struct LockInfo {
    /// The real path the marker locks.
    pub target: PathBuf,

    /// The marker directory.
    pub marker: PathBuf,

    /// Process id that created the marker.
    pub owner_pid: String,

    /// Whether the liveness oracle considers the owner a live instance.
    pub owner_alive: bool,

    /// When the marker was created, if the filesystem reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl LockInfo {
    /// Age of the marker, if its creation time is known.
    pub fn age(&self) -> Option<Duration> {
        self.created_at
            .map(|created| Utc::now().signed_duration_since(created))
    }

    /// Format the age as a human-readable string.
    pub fn age_string(&self) -> String {
        let Some(age) = self.age() else {
            return "unknown".to_string();
        };
        let minutes = age.num_minutes();
        let hours = age.num_hours();
        let days = age.num_days();

        if days > 0 {
            format!("{}d {}h", days, hours % 24)
        } else if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }
}

impl std::fmt::Display for LockInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (pid: {}, age: {}{})",
            self.target.display(),
            self.owner_pid,
            self.age_string(),
            if self.owner_alive { "" } else { ", STALE" }
        )
    }
}
