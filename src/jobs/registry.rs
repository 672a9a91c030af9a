/*!
 * Job Registry
 * Factory lookup from job kind to constructor
 */

use super::builtin::{CommandJob, SleepJob};
use super::types::{Job, JobArgs, JobDescriptor};
use crate::core::errors::ForkerError;
use crate::core::types::ForkerResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a job from its arguments
pub type JobFactory = Arc<dyn Fn(&JobArgs) -> anyhow::Result<Box<dyn Job>> + Send + Sync>;

/// Registered job kinds
#[derive(Clone, Default)]
pub struct JobRegistry {
    factories: HashMap<String, JobFactory>,
}

impl JobRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the `sleep` and `exec` jobs
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(SleepJob::KIND, |args| Ok(Box::new(SleepJob::from_args(args)?)));
        registry.register(CommandJob::KIND, |args| {
            Ok(Box::new(CommandJob::from_args(args)?))
        });
        registry
    }

    /// Register or replace the factory for `kind`
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&JobArgs) -> anyhow::Result<Box<dyn Job>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Construct the job a descriptor names
    pub fn build(&self, descriptor: &JobDescriptor) -> ForkerResult<Box<dyn Job>> {
        let factory = self
            .factories
            .get(&descriptor.kind)
            .ok_or_else(|| ForkerError::UnknownJob(descriptor.kind.clone()))?;

        factory(&descriptor.args).map_err(|e| ForkerError::InvalidJob {
            kind: descriptor.kind.clone(),
            reason: format!("{:#}", e),
        })
    }
}

impl fmt::Debug for JobRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
