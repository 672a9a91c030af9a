/*!
 * Listing Tests
 */

use crate::common::{registry, seed, sleep_job, supervisor};
use crate::fake::FakeController;
use task_forker::KillTarget;
use tempfile::TempDir;

#[test]
fn test_absent_registry() {
    let temp = TempDir::new().unwrap();
    let supervisor = supervisor(temp.path(), FakeController::new(), 1);

    assert_eq!(supervisor.pid_list().unwrap(), None);

    let mut out = Vec::new();
    assert!(!supervisor.show_pid_list(&mut out).unwrap());
    assert!(out.is_empty());
}

#[test]
fn test_emptied_registry() {
    let temp = TempDir::new().unwrap();
    let supervisor = supervisor(temp.path(), FakeController::new(), 1);
    supervisor.dispatch(&sleep_job()).unwrap();
    supervisor.terminate(Some(KillTarget::All)).unwrap();

    assert_eq!(supervisor.pid_list().unwrap(), None);
}

#[test]
fn test_listing_is_ordered_and_numbered() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[3003, 1001, 2002]);
    let supervisor = supervisor(temp.path(), FakeController::new(), 1);

    assert_eq!(supervisor.pid_list().unwrap(), Some(vec![1001, 2002, 3003]));

    let mut out = Vec::new();
    assert!(supervisor.show_pid_list(&mut out).unwrap());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Pid list:\n#1 - 1001\n#2 - 2002\n#3 - 3003\n"
    );
}

#[test]
fn test_listing_does_not_create_files() {
    let temp = TempDir::new().unwrap();
    let supervisor = supervisor(temp.path(), FakeController::new(), 1);

    supervisor.pid_list().unwrap();
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[test]
fn test_listing_locks_existing_registry() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), &[1001]);
    let lock_path = registry(temp.path()).lock_path();
    assert!(!lock_path.exists());

    let supervisor = supervisor(temp.path(), FakeController::new(), 1);
    assert_eq!(supervisor.pid_list().unwrap(), Some(vec![1001]));
    assert!(lock_path.exists());
}
