/*!
 * Supervisor Configuration
 *
 * Environment variables:
 * - FORKER_NAME: supervisor identity (required before any registry access)
 * - FORKER_RUNTIME_PATH: pidfile directory (default: /tmp)
 * - FORKER_PIDFILE_EXT: pidfile suffix (default: .pid)
 * - FORKER_MAX_PROCESS: concurrent children (default: 1)
 * - FORKER_RECLAIM_INTERVAL_MS: poll interval for slots held by foreign processes (default: 100)
 */

use crate::core::errors::ForkerError;
use crate::core::limits::{
    DEFAULT_MAX_PROCESS, DEFAULT_PIDFILE_EXTENSION, DEFAULT_RECLAIM_INTERVAL,
    DEFAULT_RUNTIME_PATH,
};
use crate::core::types::ForkerResult;
use crate::registry::FileRegistry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_NAME: &str = "FORKER_NAME";
pub const ENV_RUNTIME_PATH: &str = "FORKER_RUNTIME_PATH";
pub const ENV_PIDFILE_EXT: &str = "FORKER_PIDFILE_EXT";
pub const ENV_MAX_PROCESS: &str = "FORKER_MAX_PROCESS";
pub const ENV_RECLAIM_INTERVAL_MS: &str = "FORKER_RECLAIM_INTERVAL_MS";

/// Supervisor identity and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SupervisorConfig {
    /// Unique identity of the supervisor's pidfile on this host
    pub name: Option<String>,
    pub runtime_path: PathBuf,
    pub file_extension: String,
    pub max_process: usize,
    pub reclaim_interval_ms: u64,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            name: None,
            runtime_path: PathBuf::from(DEFAULT_RUNTIME_PATH),
            file_extension: DEFAULT_PIDFILE_EXTENSION.to_string(),
            max_process: DEFAULT_MAX_PROCESS,
            reclaim_interval_ms: DEFAULT_RECLAIM_INTERVAL.as_millis() as u64,
        }
    }
}

impl SupervisorConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Defaults overlaid with FORKER_* environment variables
    pub fn from_env() -> ForkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup<F>(lookup: F) -> ForkerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(name) = lookup(ENV_NAME) {
            config.name = Some(name);
        }
        if let Some(path) = lookup(ENV_RUNTIME_PATH) {
            config.runtime_path = PathBuf::from(path);
        }
        if let Some(ext) = lookup(ENV_PIDFILE_EXT) {
            config.file_extension = ext;
        }
        if let Some(raw) = lookup(ENV_MAX_PROCESS) {
            config.max_process = parse_var(ENV_MAX_PROCESS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RECLAIM_INTERVAL_MS) {
            config.reclaim_interval_ms = parse_var(ENV_RECLAIM_INTERVAL_MS, &raw)?;
        }

        Ok(config)
    }

    pub fn with_runtime_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.runtime_path = path.into();
        self
    }

    pub fn with_file_extension(mut self, ext: impl Into<String>) -> Self {
        self.file_extension = ext.into();
        self
    }

    pub fn with_max_process(mut self, max_process: usize) -> Self {
        self.max_process = max_process;
        self
    }

    pub fn with_reclaim_interval(mut self, interval: Duration) -> Self {
        self.reclaim_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn reclaim_interval(&self) -> Duration {
        Duration::from_millis(self.reclaim_interval_ms)
    }

    /// Check everything a registry-touching operation relies on
    pub fn validate(&self) -> ForkerResult<&str> {
        let name = match self.name.as_deref() {
            None => {
                return Err(ForkerError::InvalidConfiguration(
                    "supervisor name is not set".to_string(),
                ))
            }
            Some(name) => name,
        };

        if name.is_empty() {
            return Err(ForkerError::InvalidConfiguration(
                "supervisor name is empty".to_string(),
            ));
        }
        if name.contains('/') || name == "." || name == ".." {
            return Err(ForkerError::InvalidConfiguration(format!(
                "supervisor name '{}' is not a valid file name",
                name
            )));
        }
        if self.max_process == 0 {
            return Err(ForkerError::InvalidConfiguration(
                "max_process must be at least 1".to_string(),
            ));
        }

        Ok(name)
    }

    /// Registry for this identity, after validation
    pub fn registry(&self) -> ForkerResult<FileRegistry> {
        let name = self.validate()?;
        Ok(FileRegistry::for_identity(
            &self.runtime_path,
            name,
            &self.file_extension,
        ))
    }
}

fn parse_var<T>(key: &str, raw: &str) -> ForkerResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        ForkerError::InvalidConfiguration(format!("{}='{}': {}", key, raw, e))
    })
}
