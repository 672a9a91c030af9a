/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use nix::errno::Errno;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Supervisor errors
///
/// Configuration and job errors are raised before any lock is taken or any
/// process is created, so they are always safe to retry after fixing input.
#[derive(Error, Debug, Diagnostic)]
pub enum ForkerError {
    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(config::invalid),
        help("Set a supervisor name (FORKER_NAME or --name) and a max process count of at least 1.")
    )]
    InvalidConfiguration(String),

    #[error("Unknown job kind: {0}")]
    #[diagnostic(
        code(job::unknown),
        help("Register the job kind on the JobRegistry before dispatching it.")
    )]
    UnknownJob(String),

    #[error("Invalid arguments for job '{kind}': {reason}")]
    #[diagnostic(code(job::invalid))]
    InvalidJob { kind: String, reason: String },

    #[error("Invalid kill target: {0}")]
    #[diagnostic(
        code(terminate::invalid_target),
        help("Use 'all' or a positive process id.")
    )]
    InvalidTarget(String),

    #[error("Pidfile I/O failed for {}", path.display())]
    #[diagnostic(
        code(registry::io),
        help("Check that the runtime directory exists and is writable.")
    )]
    RegistryIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Pidfile {} is corrupt: {reason}", path.display())]
    #[diagnostic(
        code(registry::corrupt),
        help("The pidfile is not repaired automatically. Inspect it and remove it by hand.")
    )]
    Deserialization { path: PathBuf, reason: String },

    #[error("Failed to encode pid set: {0}")]
    #[diagnostic(code(registry::encode))]
    Serialization(String),

    #[error("Failed to lock {}", path.display())]
    #[diagnostic(code(registry::lock))]
    Lock {
        path: PathBuf,
        #[source]
        source: Errno,
    },

    #[error("Fork failed")]
    #[diagnostic(
        code(process::fork_failed),
        help("The host cannot create processes. Check process limits (ulimit -u) and memory.")
    )]
    ForkFailed(#[source] Errno),

    #[error("Waiting for a child process failed")]
    #[diagnostic(code(process::wait_failed))]
    WaitFailed(#[source] Errno),

    #[error("Failed to write pid listing")]
    #[diagnostic(code(output::write))]
    Output(#[source] io::Error),
}

impl ForkerError {
    pub(crate) fn registry_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ForkerError::RegistryIo {
            path: path.into(),
            source,
        }
    }

    /// True for errors raised before any OS resource was touched
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ForkerError::InvalidConfiguration(_)
                | ForkerError::UnknownJob(_)
                | ForkerError::InvalidJob { .. }
                | ForkerError::InvalidTarget(_)
        )
    }
}
