/*!
 * Process Traits
 * OS process primitives behind an injectable seam
 */

use super::types::ChildExit;
use crate::core::types::{ForkerResult, Pid};
use crate::jobs::Job;

/// Process creation, reaping and signalling
///
/// The supervisor only talks to the OS through this trait, so tests can
/// substitute a fake that never forks.
pub trait ProcessController: Send + Sync {
    /// Start `job` in a new child process and return its pid
    fn spawn(&self, job: Box<dyn Job>) -> ForkerResult<Pid>;

    /// Block until any child of the calling process terminates
    ///
    /// Returns `None` when the calling process has no children at all.
    fn wait_any(&self) -> ForkerResult<Option<ChildExit>>;

    /// Send SIGKILL to `pid`
    fn kill(&self, pid: Pid) -> nix::Result<()>;

    /// Whether `pid` still exists (zombies included)
    fn is_alive(&self, pid: Pid) -> bool;
}
