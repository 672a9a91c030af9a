/*!
 * Task Forker Library
 * Pidfile-backed supervisor that forks jobs up to a concurrency limit
 */

pub mod core;
pub mod jobs;
pub mod monitoring;
pub mod process;
pub mod registry;
pub mod supervisor;

// Re-exports
pub use crate::core::{ForkerError, ForkerResult, Pid, PidSet};
pub use jobs::{Job, JobArgs, JobDescriptor, JobRegistry};
pub use monitoring::init_tracing;
pub use process::{ChildExit, ExitKind, ForkController, ProcessController};
pub use registry::{FileRegistry, PidSnapshot};
pub use supervisor::{
    DispatchReport, KillTarget, Supervisor, SupervisorBuilder, SupervisorConfig, TerminateReport,
};
