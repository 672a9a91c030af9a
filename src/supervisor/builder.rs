/*!
 * Supervisor Builder
 * Builder pattern for Supervisor construction
 */

use super::config::SupervisorConfig;
use super::supervisor::Supervisor;
use crate::jobs::JobRegistry;
use crate::process::{ForkController, ProcessController};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Builder for Supervisor
///
/// The name may be left unset and supplied later through
/// [`Supervisor::set_name`]; registry operations fail until it is.
pub struct SupervisorBuilder {
    config: SupervisorConfig,
    controller: Option<Arc<dyn ProcessController>>,
    jobs: Option<JobRegistry>,
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self {
            config: SupervisorConfig::default(),
            controller: None,
            jobs: None,
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: SupervisorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    pub fn with_runtime_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.runtime_path = path.into();
        self
    }

    pub fn with_file_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.file_extension = ext.into();
        self
    }

    pub fn with_max_process(mut self, max_process: usize) -> Self {
        self.config.max_process = max_process;
        self
    }

    pub fn with_reclaim_interval(mut self, interval: Duration) -> Self {
        self.config = self.config.with_reclaim_interval(interval);
        self
    }

    /// Replace the OS process controller
    pub fn with_controller(mut self, controller: Arc<dyn ProcessController>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Replace the job registry (defaults to the built-in jobs)
    pub fn with_jobs(mut self, jobs: JobRegistry) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn build(self) -> Supervisor {
        let controller = self
            .controller
            .unwrap_or_else(|| Arc::new(ForkController::new()));
        let jobs = self.jobs.unwrap_or_else(JobRegistry::with_builtins);

        debug!(
            name = ?self.config.name,
            max_process = self.config.max_process,
            runtime_path = %self.config.runtime_path.display(),
            "Supervisor built"
        );

        Supervisor::from_parts(self.config, controller, jobs)
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
