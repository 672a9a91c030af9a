/*!
 * Supervisor Types
 * Kill targets and operation reports
 */

use crate::core::errors::ForkerError;
use crate::core::types::Pid;
use crate::process::ChildExit;
use nix::errno::Errno;
use std::fmt;
use std::str::FromStr;

/// What `terminate` should kill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillTarget {
    /// Every tracked pid
    All,
    /// One tracked pid
    Pid(Pid),
}

impl FromStr for KillTarget {
    type Err = ForkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(KillTarget::All);
        }
        s.parse::<Pid>()
            .map(KillTarget::Pid)
            .map_err(|_| ForkerError::InvalidTarget(s.to_string()))
    }
}

impl fmt::Display for KillTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KillTarget::All => f.write_str("all"),
            KillTarget::Pid(pid) => write!(f, "{}", pid),
        }
    }
}

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Pid of the new child
    pub pid: Pid,
    /// Children whose slots were reclaimed to admit this one
    pub reclaimed: Vec<ChildExit>,
}

impl DispatchReport {
    /// Reclaimed children that did not exit with code 0
    pub fn failures(&self) -> impl Iterator<Item = &ChildExit> {
        self.reclaimed.iter().filter(|exit| !exit.success())
    }
}

/// A kill that the OS refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillFailure {
    pub pid: Pid,
    pub errno: Errno,
}

/// Result of a terminate that had something to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminateReport {
    /// SIGKILL delivered; removed from the registry
    pub killed: Vec<Pid>,
    /// No such process anymore; removed from the registry
    pub already_gone: Vec<Pid>,
    /// Signal refused; still tracked
    pub failed: Vec<KillFailure>,
}

impl TerminateReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Pids no longer tracked after this terminate
    pub fn removed(&self) -> impl Iterator<Item = Pid> + '_ {
        self.killed.iter().chain(&self.already_gone).copied()
    }
}
