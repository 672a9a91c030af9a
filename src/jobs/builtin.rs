/*!
 * Built-in Jobs
 */

use super::types::{Job, JobArgs};
use anyhow::{bail, Context};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Sleeps for `seconds` (default 1), then succeeds
#[derive(Debug, Clone, PartialEq)]
pub struct SleepJob {
    duration: Duration,
}

impl SleepJob {
    pub const KIND: &'static str = "sleep";

    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_args(args: &JobArgs) -> anyhow::Result<Self> {
        let seconds = args.parse::<f64>("seconds")?.unwrap_or(1.0);
        let duration = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("invalid duration: {} seconds", seconds))?;
        Ok(Self::new(duration))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Job for SleepJob {
    fn perform(&mut self) -> anyhow::Result<()> {
        thread::sleep(self.duration);
        Ok(())
    }
}

/// Runs `command` (split on whitespace, no shell) and waits for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandJob {
    program: String,
    args: Vec<String>,
}

impl CommandJob {
    pub const KIND: &'static str = "exec";

    pub fn from_args(args: &JobArgs) -> anyhow::Result<Self> {
        let line = args.require("command")?;
        let mut parts = line.split_whitespace().map(str::to_string);
        let Some(program) = parts.next() else {
            bail!("argument 'command' is empty");
        };

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Job for CommandJob {
    fn perform(&mut self) -> anyhow::Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .with_context(|| format!("failed to start '{}'", self.program))?;

        info!(program = %self.program, code = ?status.code(), "Command finished");

        if !status.success() {
            bail!("'{}' exited with {}", self.program, status);
        }
        Ok(())
    }
}
