/*!
 * File Registry
 * Pidfile-backed storage of the live pid set for one supervisor identity
 */

use super::codec::{self, CodecError};
use super::lock::{LockMode, RegistryGuard};
use crate::core::errors::ForkerError;
use crate::core::limits::LOCK_FILE_SUFFIX;
use crate::core::types::{ForkerResult, PidSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// What a pidfile held when it was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PidSnapshot {
    /// No pidfile exists yet
    Missing,
    /// The pidfile exists but records no pids
    Empty,
    /// The pidfile records at least one pid
    Tracked(PidSet),
}

impl PidSnapshot {
    /// Collapse both empty forms into an empty set
    pub fn into_pids(self) -> PidSet {
        match self {
            PidSnapshot::Tracked(pids) => pids,
            PidSnapshot::Missing | PidSnapshot::Empty => PidSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !matches!(self, PidSnapshot::Tracked(_))
    }
}

/// Pidfile at `{runtime_path}/{name}{extension}`
///
/// Writes replace the file through a rename, so readers never observe a
/// partially written set. Read-modify-write cycles must hold an exclusive
/// [`RegistryGuard`] from [`FileRegistry::lock`] to avoid lost updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRegistry {
    path: PathBuf,
}

impl FileRegistry {
    /// Registry at an explicit pidfile path
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Registry for a supervisor identity
    pub fn for_identity(runtime_path: &Path, name: &str, extension: &str) -> Self {
        Self::new(runtime_path.join(format!("{}{}", name, extension)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the advisory lock file next to the pidfile
    pub fn lock_path(&self) -> PathBuf {
        sibling(&self.path, LOCK_FILE_SUFFIX)
    }

    /// Block until the registry lock is held in `mode`
    pub fn lock(&self, mode: LockMode) -> ForkerResult<RegistryGuard> {
        RegistryGuard::acquire(&self.lock_path(), mode)
    }

    /// Read the pidfile
    pub fn load(&self) -> ForkerResult<PidSnapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PidSnapshot::Missing),
            Err(e) => return Err(ForkerError::registry_io(&self.path, e)),
        };

        let pids = codec::decode(&bytes).map_err(|e| self.corrupt(e))?;
        if pids.is_empty() {
            Ok(PidSnapshot::Empty)
        } else {
            Ok(PidSnapshot::Tracked(pids))
        }
    }

    /// Replace the pidfile contents with `pids`
    pub fn save(&self, pids: &PidSet) -> ForkerResult<()> {
        let bytes = codec::encode(pids).map_err(ForkerError::Serialization)?;
        let staging = sibling(&self.path, &format!(".tmp.{}", std::process::id()));

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&staging)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&staging, &self.path)
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&staging);
            return Err(ForkerError::registry_io(&self.path, e));
        }

        debug!(path = %self.path.display(), count = pids.len(), "Pidfile saved");
        Ok(())
    }

    fn corrupt(&self, err: CodecError) -> ForkerError {
        ForkerError::Deserialization {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}
