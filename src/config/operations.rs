//! Config loading, validation, and path helpers.

use super::model::Config;
use crate::error::{LockError, Result};
use std::path::{Component, Path, PathBuf};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `gate_dir` and `tree_dir` must each be a single plain path component
    /// - `gate_dir` and `tree_dir` must differ
    /// - `process_name`, when set, must be non-empty
    pub fn validate(&self) -> Result<()> {
        validate_dir_name("gate_dir", &self.gate_dir)?;
        validate_dir_name("tree_dir", &self.tree_dir)?;

        if self.gate_dir == self.tree_dir {
            return Err(LockError::Config(
                "config validation failed: gate_dir and tree_dir must differ".to_string(),
            ));
        }

        if let Some(name) = &self.process_name
            && name.trim().is_empty()
        {
            return Err(LockError::Config(
                "config validation failed: process_name must be non-empty when set".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the global gate marker directory.
    pub fn gate_path(&self) -> PathBuf {
        self.lock_root.join(&self.gate_dir)
    }

    /// Path of the phantom tree root.
    pub fn tree_root(&self) -> PathBuf {
        self.lock_root.join(&self.tree_dir)
    }
}

fn validate_dir_name(field: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(LockError::Config(format!(
            "config validation failed: {} must be a single directory name, got '{}'",
            field, value
        ))),
    }
}
