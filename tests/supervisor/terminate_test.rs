/*!
 * Terminate Tests
 */

use crate::common::{registry, seed, set, sleep_job, supervisor, tracked, MockController};
use crate::fake::FakeController;
use nix::errno::Errno;
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use task_forker::{ForkerError, KillTarget, PidSnapshot, Supervisor};
use tempfile::TempDir;

fn with_children(count: usize) -> (TempDir, Arc<FakeController>, Supervisor, Vec<i32>) {
    let temp = TempDir::new().unwrap();
    let controller = FakeController::new();
    let supervisor = supervisor(temp.path(), controller.clone(), count.max(1));
    let pids = (0..count)
        .map(|_| supervisor.dispatch(&sleep_job()).unwrap().pid)
        .collect();
    (temp, controller, supervisor, pids)
}

#[test]
fn test_no_target_is_noop() {
    let (temp, controller, supervisor, pids) = with_children(2);

    assert_eq!(supervisor.terminate(None).unwrap(), None);
    assert!(controller.kills().is_empty());
    assert_eq!(tracked(temp.path()), set(&pids));
}

#[test]
fn test_single_pid() {
    let (temp, controller, supervisor, pids) = with_children(2);

    let report = supervisor
        .terminate(Some(KillTarget::Pid(pids[0])))
        .unwrap()
        .unwrap();

    assert_eq!(report.killed, vec![pids[0]]);
    assert!(report.is_complete());
    assert_eq!(controller.kills(), vec![pids[0]]);
    assert_eq!(tracked(temp.path()), set(&[pids[1]]));
}

#[test]
fn test_untracked_pid_is_noop() {
    let (temp, controller, supervisor, _) = with_children(2);
    let before = fs::read(registry(temp.path()).path()).unwrap();

    assert_eq!(supervisor.terminate(Some(KillTarget::Pid(99999))).unwrap(), None);

    assert!(controller.kills().is_empty());
    assert_eq!(fs::read(registry(temp.path()).path()).unwrap(), before);
}

#[test]
fn test_non_positive_pid_is_noop() {
    let (_temp, controller, supervisor, _) = with_children(1);

    assert_eq!(supervisor.terminate(Some(KillTarget::Pid(0))).unwrap(), None);
    assert_eq!(supervisor.terminate(Some(KillTarget::Pid(-1))).unwrap(), None);
    assert!(controller.kills().is_empty());
}

#[test]
fn test_all_twice() {
    let (temp, controller, supervisor, pids) = with_children(3);

    let report = supervisor.terminate(Some(KillTarget::All)).unwrap().unwrap();
    assert_eq!(report.killed, pids);
    assert_eq!(registry(temp.path()).load().unwrap(), PidSnapshot::Empty);

    assert_eq!(supervisor.terminate(Some(KillTarget::All)).unwrap(), None);
    assert_eq!(controller.kills().len(), 3);
}

#[test]
fn test_empty_registry_is_noop() {
    let temp = TempDir::new().unwrap();
    let controller = FakeController::new();
    let supervisor = supervisor(temp.path(), controller.clone(), 1);

    assert_eq!(supervisor.terminate(Some(KillTarget::All)).unwrap(), None);
    assert_eq!(registry(temp.path()).load().unwrap(), PidSnapshot::Missing);
}

#[test]
fn test_refused_kill_stays_tracked() {
    let (temp, controller, supervisor, pids) = with_children(2);
    controller.refuse_kill(pids[1], Errno::EPERM);

    let report = supervisor.terminate(Some(KillTarget::All)).unwrap().unwrap();

    assert_eq!(report.killed, vec![pids[0]]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].pid, pids[1]);
    assert_eq!(report.failed[0].errno, Errno::EPERM);
    assert!(!report.is_complete());
    assert_eq!(tracked(temp.path()), set(&[pids[1]]));
}

#[test]
fn test_vanished_pid_is_removed() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[4242, 4243]);
    let controller = FakeController::new();
    controller.adopt(4243);
    let supervisor = supervisor(temp.path(), controller.clone(), 2);

    let report = supervisor.terminate(Some(KillTarget::All)).unwrap().unwrap();

    assert_eq!(report.already_gone, vec![4242]);
    assert_eq!(report.killed, vec![4243]);
    assert!(tracked(temp.path()).is_empty());
}

#[test]
fn test_missing_name_kills_nothing() {
    let temp = TempDir::new().unwrap();
    let mut controller = MockController::new();
    controller.expect_kill().never();

    let supervisor = Supervisor::builder()
        .with_runtime_path(temp.path())
        .with_controller(Arc::new(controller))
        .build();

    let result = supervisor.terminate(Some(KillTarget::All));
    assert!(matches!(result, Err(ForkerError::InvalidConfiguration(_))));
}
