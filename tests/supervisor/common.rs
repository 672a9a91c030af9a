/*!
 * Shared helpers for supervisor tests
 */

#![allow(dead_code)]

use mockall::mock;
use std::path::Path;
use std::sync::Arc;
use task_forker::{
    ChildExit, FileRegistry, ForkerResult, Job, JobDescriptor, Pid, PidSet, ProcessController,
    Supervisor,
};

mock! {
    pub Controller {}

    impl ProcessController for Controller {
        fn spawn(&self, job: Box<dyn Job>) -> ForkerResult<Pid>;
        fn wait_any(&self) -> ForkerResult<Option<ChildExit>>;
        fn kill(&self, pid: Pid) -> nix::Result<()>;
        fn is_alive(&self, pid: Pid) -> bool;
    }
}

pub const NAME: &str = "build-worker";

pub fn supervisor(
    runtime: &Path,
    controller: Arc<dyn ProcessController>,
    max_process: usize,
) -> Supervisor {
    Supervisor::builder()
        .with_name(NAME)
        .with_runtime_path(runtime)
        .with_max_process(max_process)
        .with_controller(controller)
        .build()
}

pub fn registry(runtime: &Path) -> FileRegistry {
    FileRegistry::for_identity(runtime, NAME, ".pid")
}

pub fn tracked(runtime: &Path) -> PidSet {
    registry(runtime).load().unwrap().into_pids()
}

pub fn seed(runtime: &Path, pids: &[Pid]) {
    registry(runtime)
        .save(&pids.iter().copied().collect())
        .unwrap();
}

pub fn sleep_job() -> JobDescriptor {
    JobDescriptor::new("sleep").with_arg("seconds", "0")
}

pub fn set(pids: &[Pid]) -> PidSet {
    pids.iter().copied().collect()
}
