/*!
 * Jobs Module
 * Work units executed inside child processes
 */

pub mod builtin;
pub mod registry;
pub mod types;

// Re-export for convenience
pub use builtin::{CommandJob, SleepJob};
pub use registry::{JobFactory, JobRegistry};
pub use types::{Job, JobArgs, JobDescriptor};
