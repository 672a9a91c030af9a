/*!
 * Registry Lock
 *
 * POSIX record locks (`fcntl(F_SETLKW)`) on a sibling lock file serialize
 * read-modify-write cycles on the pidfile between processes.
 *
 * Record locks belong to the process that took them: a forked child does not
 * inherit them, and closing the descriptor releases them. That lets the
 * supervisor fork while holding the lock without the child keeping it alive.
 * They do not exclude two holders inside the same process.
 */

use crate::core::errors::ForkerError;
use crate::core::types::ForkerResult;
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg};
use nix::libc;
use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Lock mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Readers only; any number may hold it
    Shared,
    /// Read-modify-write
    Exclusive,
}

/// Held registry lock, released on drop
#[derive(Debug)]
pub struct RegistryGuard {
    path: PathBuf,
    mode: LockMode,
    _file: File,
}

impl RegistryGuard {
    /// Block until the lock at `path` is acquired in `mode`
    pub fn acquire(path: &Path, mode: LockMode) -> ForkerResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| ForkerError::registry_io(path, e))?;

        let lock_type = match mode {
            LockMode::Shared => libc::F_RDLCK,
            LockMode::Exclusive => libc::F_WRLCK,
        };

        // SAFETY: flock is a plain C struct of integers. Zero is a valid value
        // for every field, including l_pid (ignored by F_SETLKW) and any
        // platform padding; l_start = l_len = 0 covers the whole file
        let mut request: libc::flock = unsafe { std::mem::zeroed() };
        request.l_type = lock_type as libc::c_short;
        request.l_whence = libc::SEEK_SET as libc::c_short;
        request.l_start = 0;
        request.l_len = 0;

        loop {
            match fcntl(file.as_raw_fd(), FcntlArg::F_SETLKW(&request)) {
                Ok(_) => break,
                Err(Errno::EINTR) => continue,
                Err(source) => {
                    return Err(ForkerError::Lock {
                        path: path.to_path_buf(),
                        source,
                    })
                }
            }
        }

        trace!(path = %path.display(), ?mode, "Registry lock acquired");

        Ok(Self {
            path: path.to_path_buf(),
            mode,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for RegistryGuard {
    fn drop(&mut self) {
        trace!(path = %self.path.display(), mode = ?self.mode, "Registry lock released");
    }
}
