/*!
 * Fake Process Controller
 * In-memory process table that never forks
 */

#![allow(dead_code)]

use nix::errno::Errno;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use task_forker::{ChildExit, ForkerResult, Job, Pid, ProcessController};

#[derive(Default)]
struct FakeState {
    next_pid: Pid,
    /// Children that are running, plus adopted foreign processes
    alive: BTreeSet<Pid>,
    /// Children that exited and wait to be reaped, oldest first
    zombies: VecDeque<ChildExit>,
    refused: HashMap<Pid, Errno>,
    spawned: Vec<Pid>,
    kills: Vec<Pid>,
    waits: usize,
}

/// Scriptable controller: children run until `finish` is called
pub struct FakeController {
    state: Mutex<FakeState>,
}

impl FakeController {
    pub fn new() -> Arc<Self> {
        Self::starting_at(1001)
    }

    pub fn starting_at(first_pid: Pid) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeState {
                next_pid: first_pid,
                ..FakeState::default()
            }),
        })
    }

    /// Child `pid` exits with `code`; it stays visible until reaped
    pub fn finish(&self, pid: Pid, code: i32) {
        let mut state = self.state.lock();
        assert!(state.alive.remove(&pid), "pid {} is not running", pid);
        state.zombies.push_back(ChildExit::exited(pid, code));
    }

    /// A live process that is not a child of this supervisor
    pub fn adopt(&self, pid: Pid) {
        self.state.lock().alive.insert(pid);
    }

    /// Make kills of `pid` fail with `errno`
    pub fn refuse_kill(&self, pid: Pid, errno: Errno) {
        self.state.lock().refused.insert(pid, errno);
    }

    pub fn spawned(&self) -> Vec<Pid> {
        self.state.lock().spawned.clone()
    }

    pub fn kills(&self) -> Vec<Pid> {
        self.state.lock().kills.clone()
    }

    pub fn waits(&self) -> usize {
        self.state.lock().waits
    }

    pub fn running(&self) -> BTreeSet<Pid> {
        self.state.lock().alive.clone()
    }
}

impl ProcessController for FakeController {
    fn spawn(&self, _job: Box<dyn Job>) -> ForkerResult<Pid> {
        let mut state = self.state.lock();
        let pid = state.next_pid;
        state.next_pid += 1;
        state.alive.insert(pid);
        state.spawned.push(pid);
        Ok(pid)
    }

    fn wait_any(&self) -> ForkerResult<Option<ChildExit>> {
        let mut state = self.state.lock();
        state.waits += 1;

        if let Some(exit) = state.zombies.pop_front() {
            return Ok(Some(exit));
        }
        let children: Vec<Pid> = state
            .spawned
            .iter()
            .copied()
            .filter(|pid| state.alive.contains(pid))
            .collect();
        if children.is_empty() {
            return Ok(None);
        }
        panic!("wait_any would block forever on {:?}", children);
    }

    fn kill(&self, pid: Pid) -> nix::Result<()> {
        let mut state = self.state.lock();
        state.kills.push(pid);

        if let Some(errno) = state.refused.get(&pid) {
            return Err(*errno);
        }
        if state.alive.remove(&pid) {
            Ok(())
        } else {
            Err(Errno::ESRCH)
        }
    }

    fn is_alive(&self, pid: Pid) -> bool {
        let state = self.state.lock();
        state.alive.contains(&pid) || state.zombies.iter().any(|exit| exit.pid == pid)
    }
}
