//! # Init Lock
//!
//! Advisory lock around the bootstrap sequence so two processes never
//! initialize the same directory at once. Uses `fs2` (flock on Unix,
//! LockFile on Windows).

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the init lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// Lock file could not be created.
    #[error("Failed to create lock file {}: {source}", path.display())]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another process holds the lock.
    #[error("{} is locked by {}", path.display(), holder(*pid))]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    /// Failed to write the PID to the lock file.
    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(#[source] io::Error),
}

fn holder(pid: Option<u32>) -> String {
    match pid {
        Some(pid) => format!("process {}", pid),
        None => "another process".to_string(),
    }
}

/// Exclusive lock on a directory, released on drop.
///
/// ```ignore
/// let lock = InitLock::acquire(Path::new("/var/lib/quantum-chain"))?;
/// // bootstrap runs while `lock` is alive
/// ```
#[derive(Debug)]
pub struct InitLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl InitLock {
    /// Lock file name.
    pub const LOCK_FILE: &'static str = "init.lock";

    /// Take the lock on `dir` without waiting.
    ///
    /// `dir` must exist.
    pub fn acquire(dir: &Path) -> Result<Self, LockError> {
        let lock_path = dir.join(Self::LOCK_FILE);

        // Opened without truncation so a holder's PID survives a failed attempt.
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|source| LockError::CreateFailed {
                path: lock_path.clone(),
                source,
            })?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&lock_path),
                path: lock_path,
            });
        }

        let pid = std::process::id();
        let mut locked_file = file;
        locked_file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(locked_file, "{}", pid).map_err(LockError::WriteFailed)?;
        locked_file.sync_all().map_err(LockError::WriteFailed)?;

        debug!(path = %lock_path.display(), pid, "Acquired init lock");

        Ok(Self {
            file: locked_file,
            path: lock_path,
            pid,
        })
    }

    /// PID written into the lock file.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for InitLock {
    fn drop(&mut self) {
        // Never removed: every contender must lock the same inode.
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release init lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_writes_pid() {
        let dir = TempDir::new().unwrap();
        let lock = InitLock::acquire(dir.path()).unwrap();

        let contents = std::fs::read_to_string(lock.path()).unwrap();
        assert_eq!(contents.trim(), std::process::id().to_string());
        assert_eq!(lock.pid(), std::process::id());
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = TempDir::new().unwrap();
        let _lock = InitLock::acquire(dir.path()).unwrap();

        match InitLock::acquire(dir.path()) {
            Err(LockError::AlreadyLocked { pid, .. }) => {
                assert_eq!(pid, Some(std::process::id()))
            }
            other => panic!("expected AlreadyLocked, got {:?}", other),
        }
    }

    #[test]
    fn test_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let lock = InitLock::acquire(dir.path()).unwrap();
        let path = lock.path().to_path_buf();
        drop(lock);

        assert!(path.exists());
        InitLock::acquire(dir.path()).unwrap();
    }

    #[test]
    fn test_waiting_handle_and_new_acquirer_never_both_hold() {
        let dir = TempDir::new().unwrap();
        let first = InitLock::acquire(dir.path()).unwrap();

        // A contender that opened the lock file while it was held.
        let waiting = OpenOptions::new()
            .read(true)
            .write(true)
            .open(first.path())
            .unwrap();
        assert!(waiting.try_lock_exclusive().is_err());
        drop(first);

        let second = InitLock::acquire(dir.path()).unwrap();
        assert!(waiting.try_lock_exclusive().is_err());

        drop(second);
        assert!(waiting.try_lock_exclusive().is_ok());
        assert!(matches!(
            InitLock::acquire(dir.path()),
            Err(LockError::AlreadyLocked { .. })
        ));
    }

    #[test]
    fn test_missing_dir_is_create_failure() {
        let dir = TempDir::new().unwrap();
        let err = InitLock::acquire(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, LockError::CreateFailed { .. }));
    }
}
