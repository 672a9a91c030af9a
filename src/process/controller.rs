/*!
 * Fork Controller
 * Process primitives backed by fork(2), wait(2) and kill(2)
 */

use super::traits::ProcessController;
use super::types::ChildExit;
use crate::core::errors::ForkerError;
use crate::core::limits::CHILD_EXIT_GRACE;
use crate::core::types::{ForkerResult, Pid};
use crate::jobs::Job;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::sys::wait::wait;
use nix::unistd::{fork, ForkResult, Pid as NixPid};
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info};

/// Exit status of a child whose job succeeded
const CHILD_SUCCESS: i32 = 0;
/// Exit status of a child whose job returned an error
const CHILD_FAILURE: i32 = 1;

/// Real OS process controller
///
/// Forking is only sound from a single-threaded process; the `forker` binary
/// never starts extra threads.
#[derive(Debug, Clone)]
pub struct ForkController {
    exit_grace: Duration,
}

impl ForkController {
    pub fn new() -> Self {
        Self {
            exit_grace: CHILD_EXIT_GRACE,
        }
    }

    /// Override the pause a child takes before exiting
    pub fn with_exit_grace(mut self, exit_grace: Duration) -> Self {
        self.exit_grace = exit_grace;
        self
    }

    /// Child side of a fork: run the job and exit, never returning
    fn run_child(&self, mut job: Box<dyn Job>) -> ! {
        let code = match job.perform() {
            Ok(()) => CHILD_SUCCESS,
            Err(e) => {
                let reason = format!("{:#}", e);
                error!(pid = std::process::id(), error = %reason, "Job failed");
                CHILD_FAILURE
            }
        };

        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
        thread::sleep(self.exit_grace);
        std::process::exit(code)
    }
}

impl Default for ForkController {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessController for ForkController {
    fn spawn(&self, job: Box<dyn Job>) -> ForkerResult<Pid> {
        // Buffered output would otherwise be copied into the child and written twice
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();

        // SAFETY: the child only runs the job and exits; callers fork from a
        // single-threaded process so no lock can be held by a vanished thread
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => {
                debug!(pid = child.as_raw(), "Forked child");
                Ok(child.as_raw())
            }
            Ok(ForkResult::Child) => self.run_child(job),
            Err(errno) => {
                error!(%errno, "Fork failed");
                Err(ForkerError::ForkFailed(errno))
            }
        }
    }

    fn wait_any(&self) -> ForkerResult<Option<ChildExit>> {
        loop {
            match wait() {
                Ok(status) => {
                    if let Some(exit) = ChildExit::from_wait_status(status) {
                        info!(pid = exit.pid, status = ?exit.status, "Child reaped");
                        return Ok(Some(exit));
                    }
                }
                Err(Errno::EINTR) => continue,
                Err(Errno::ECHILD) => return Ok(None),
                Err(errno) => return Err(ForkerError::WaitFailed(errno)),
            }
        }
    }

    fn kill(&self, pid: Pid) -> nix::Result<()> {
        kill(NixPid::from_raw(pid), Signal::SIGKILL)
    }

    fn is_alive(&self, pid: Pid) -> bool {
        match kill(NixPid::from_raw(pid), None) {
            Ok(()) => true,
            Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }
}
