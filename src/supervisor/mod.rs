/*!
 * Supervisor Module
 * Named, admission-controlled supervision of forked jobs
 */

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod supervisor;
pub mod types;

// Re-export for convenience
pub use builder::SupervisorBuilder;
pub use config::SupervisorConfig;
pub use supervisor::Supervisor;
pub use types::{DispatchReport, KillFailure, KillTarget, TerminateReport};
