/*!
 * Process Types
 * Exit records for reclaimed children
 */

use crate::core::types::Pid;
use nix::sys::wait::WaitStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a reclaimed child ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ExitKind {
    /// Exited normally with a status code
    Exited(i32),
    /// Killed by a signal
    Signaled(String),
    /// Found gone by a liveness probe; the status was collected elsewhere
    Unknown,
}

/// A child whose slot was reclaimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildExit {
    pub pid: Pid,
    pub status: ExitKind,
}

impl ChildExit {
    pub fn exited(pid: Pid, code: i32) -> Self {
        Self {
            pid,
            status: ExitKind::Exited(code),
        }
    }

    pub fn signaled(pid: Pid, signal: impl Into<String>) -> Self {
        Self {
            pid,
            status: ExitKind::Signaled(signal.into()),
        }
    }

    pub fn vanished(pid: Pid) -> Self {
        Self {
            pid,
            status: ExitKind::Unknown,
        }
    }

    /// Map a terminal wait status; `None` for stop/continue notifications
    pub fn from_wait_status(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(pid, code) => Some(Self::exited(pid.as_raw(), code)),
            WaitStatus::Signaled(pid, signal, _) => {
                Some(Self::signaled(pid.as_raw(), signal.as_str()))
            }
            _ => None,
        }
    }

    /// Exit code 0
    pub fn success(&self) -> bool {
        self.status == ExitKind::Exited(0)
    }
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ExitKind::Exited(code) => write!(f, "pid {} exited with code {}", self.pid, code),
            ExitKind::Signaled(signal) => write!(f, "pid {} killed by {}", self.pid, signal),
            ExitKind::Unknown => write!(f, "pid {} is gone (status unknown)", self.pid),
        }
    }
}
