/*!
 * Supervisor
 *
 * Admission-controlled job dispatch over a pidfile-backed registry.
 *
 * # Admission
 *
 * `dispatch` admits a job only while fewer than `max_process` pids are
 * tracked. At capacity it releases the registry lock and reclaims one slot:
 *
 * 1. tracked pids that no longer exist are dropped (children started by an
 *    earlier invocation are not ours to wait on);
 * 2. otherwise it blocks until any child of this process exits;
 * 3. if this process has no children at all, it sleeps `reclaim_interval`
 *    and checks again.
 *
 * The fork happens under the exclusive lock; record locks are not inherited,
 * so the child never holds it.
 *
 * # Limitations
 *
 * Which child frees a slot is up to the OS. The wait has no timeout. Pid
 * reuse by unrelated processes can keep a stale pid looking alive.
 */

use super::builder::SupervisorBuilder;
use super::config::SupervisorConfig;
use super::types::{DispatchReport, KillFailure, KillTarget, TerminateReport};
use crate::core::types::{ForkerResult, Pid, PidSet};
use crate::core::ForkerError;
use crate::jobs::{Job, JobDescriptor, JobRegistry};
use crate::process::{ChildExit, ForkController, ProcessController};
use crate::registry::{FileRegistry, LockMode};
use nix::errno::Errno;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, instrument, warn};

/// Named supervisor of forked job processes
pub struct Supervisor {
    config: SupervisorConfig,
    controller: Arc<dyn ProcessController>,
    jobs: JobRegistry,
}

impl Supervisor {
    /// Supervisor with the real fork controller and built-in jobs
    pub fn new(config: SupervisorConfig) -> Self {
        Self::from_parts(
            config,
            Arc::new(ForkController::new()),
            JobRegistry::with_builtins(),
        )
    }

    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    pub(super) fn from_parts(
        config: SupervisorConfig,
        controller: Arc<dyn ProcessController>,
        jobs: JobRegistry,
    ) -> Self {
        Self {
            config,
            controller,
            jobs,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.config.name = Some(name.into());
        self
    }

    pub fn max_process(&self) -> usize {
        self.config.max_process
    }

    pub fn set_max_process(&mut self, max_process: usize) -> &mut Self {
        self.config.max_process = max_process;
        self
    }

    pub fn file_extension(&self) -> &str {
        &self.config.file_extension
    }

    pub fn set_file_extension(&mut self, ext: impl Into<String>) -> &mut Self {
        self.config.file_extension = ext.into();
        self
    }

    pub fn runtime_path(&self) -> &Path {
        &self.config.runtime_path
    }

    pub fn set_runtime_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.config.runtime_path = path.into();
        self
    }

    pub fn jobs(&self) -> &JobRegistry {
        &self.jobs
    }

    pub fn jobs_mut(&mut self) -> &mut JobRegistry {
        &mut self.jobs
    }

    /// Pidfile path for the current identity
    pub fn pid_file_path(&self) -> ForkerResult<PathBuf> {
        self.config.registry().map(|r| r.path().to_path_buf())
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Build the described job and run it in a new child once a slot is free
    #[instrument(skip_all, fields(name = ?self.config.name, kind = %descriptor.kind))]
    pub fn dispatch(&self, descriptor: &JobDescriptor) -> ForkerResult<DispatchReport> {
        let registry = self.config.registry()?;
        let job = self.jobs.build(descriptor)?;
        self.launch(&registry, job)
    }

    /// Run an already constructed job in a new child once a slot is free
    #[instrument(skip_all, fields(name = ?self.config.name))]
    pub fn dispatch_job(&self, job: Box<dyn Job>) -> ForkerResult<DispatchReport> {
        let registry = self.config.registry()?;
        self.launch(&registry, job)
    }

    fn launch(&self, registry: &FileRegistry, job: Box<dyn Job>) -> ForkerResult<DispatchReport> {
        let max = self.config.max_process;
        let mut reclaimed: Vec<ChildExit> = Vec::new();

        let (_guard, mut pids) = loop {
            let guard = registry.lock(LockMode::Exclusive)?;
            let mut pids = registry.load()?.into_pids();

            let before = pids.len();
            for exit in &reclaimed {
                pids.remove(&exit.pid);
            }
            if pids.len() != before {
                registry.save(&pids)?;
            }

            if pids.len() < max {
                break (guard, pids);
            }

            drop(guard);
            debug!(tracked = pids.len(), max, "At capacity, reclaiming a slot");
            self.reclaim_slot(&pids, &mut reclaimed)?;
        };

        let pid = self.controller.spawn(job)?;
        pids.insert(pid);

        if let Err(e) = registry.save(&pids) {
            error!(pid, error = %e, "Child started but the pidfile was not updated");
            return Err(e);
        }

        info!(pid, tracked = pids.len(), max, "Job dispatched");
        Ok(DispatchReport { pid, reclaimed })
    }

    fn reclaim_slot(&self, tracked: &PidSet, reclaimed: &mut Vec<ChildExit>) -> ForkerResult<()> {
        let vanished: Vec<ChildExit> = tracked
            .iter()
            .copied()
            .filter(|pid| !self.controller.is_alive(*pid))
            .map(ChildExit::vanished)
            .collect();

        if !vanished.is_empty() {
            for exit in &vanished {
                info!(pid = exit.pid, "Tracked process is gone, slot reclaimed");
            }
            reclaimed.extend(vanished);
            return Ok(());
        }

        match self.controller.wait_any()? {
            Some(exit) if tracked.contains(&exit.pid) => {
                if exit.success() {
                    info!(pid = exit.pid, "Child exited, slot reclaimed");
                } else {
                    warn!(pid = exit.pid, status = ?exit.status, "Child failed, slot reclaimed");
                }
                reclaimed.push(exit);
            }
            Some(exit) => {
                debug!(pid = exit.pid, status = ?exit.status, "Reaped untracked child");
            }
            None => {
                let interval = self.config.reclaim_interval();
                debug!(?interval, "No children to wait on, polling tracked pids");
                thread::sleep(interval);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Terminate
    // ------------------------------------------------------------------

    /// SIGKILL one tracked child or all of them
    ///
    /// Returns `None` when there was nothing to do: no target, a non-positive
    /// pid, an empty registry, or a pid that is not tracked.
    #[instrument(skip_all, fields(name = ?self.config.name, kill_target = ?target))]
    pub fn terminate(&self, target: Option<KillTarget>) -> ForkerResult<Option<TerminateReport>> {
        let Some(target) = target else {
            return Ok(None);
        };
        if let KillTarget::Pid(pid) = target {
            if pid <= 0 {
                return Ok(None);
            }
        }

        let registry = self.config.registry()?;
        if registry.load()?.is_empty() {
            return Ok(None);
        }

        let _guard = registry.lock(LockMode::Exclusive)?;
        let mut pids = registry.load()?.into_pids();

        let targets: Vec<Pid> = match target {
            KillTarget::All => pids.iter().copied().collect(),
            KillTarget::Pid(pid) if pids.contains(&pid) => vec![pid],
            KillTarget::Pid(_) => return Ok(None),
        };
        if targets.is_empty() {
            return Ok(None);
        }

        let mut report = TerminateReport::default();
        for pid in targets {
            match self.controller.kill(pid) {
                Ok(()) => {
                    info!(pid, "Killed");
                    pids.remove(&pid);
                    report.killed.push(pid);
                }
                Err(Errno::ESRCH) => {
                    debug!(pid, "Already gone");
                    pids.remove(&pid);
                    report.already_gone.push(pid);
                }
                Err(errno) => {
                    warn!(pid, %errno, "Kill refused, pid stays tracked");
                    report.failed.push(KillFailure { pid, errno });
                }
            }
        }

        registry.save(&pids)?;
        Ok(Some(report))
    }

    // ------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------

    /// Tracked pids in ascending order, or `None` if there are none
    ///
    /// Reads under a shared lock once a pidfile exists, so a listing never
    /// interleaves with another process's read-modify-write.
    pub fn pid_list(&self) -> ForkerResult<Option<Vec<Pid>>> {
        let registry = self.config.registry()?;
        if registry.load()?.is_empty() {
            return Ok(None);
        }

        let _guard = registry.lock(LockMode::Shared)?;
        let pids = registry.load()?.into_pids();

        if pids.is_empty() {
            return Ok(None);
        }
        Ok(Some(pids.into_iter().collect()))
    }

    /// Write a numbered listing of tracked pids; `false` if there are none
    pub fn show_pid_list(&self, out: &mut dyn Write) -> ForkerResult<bool> {
        let Some(pids) = self.pid_list()? else {
            return Ok(false);
        };

        let mut write = || -> std::io::Result<()> {
            writeln!(out, "Pid list:")?;
            for (i, pid) in pids.iter().enumerate() {
                writeln!(out, "#{} - {}", i + 1, pid)?;
            }
            out.flush()
        };
        write().map_err(ForkerError::Output)?;

        Ok(true)
    }
}

impl std::fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}
