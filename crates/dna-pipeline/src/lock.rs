//! Advisory per-object lock file.
//!
//! Preview and publish both read and write an object's step records and its
//! silver output. Callers that can run concurrently take this lock first so
//! two processes never interleave on the same object. The lock is a file at
//! `<lake_root>/.locks/object-<id>.lock` holding the owner's PID; a lock left
//! behind by a dead process is reclaimed.

use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;

const LOCK_DIR: &str = ".locks";
const LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum LockError {
    #[error("object {object_id} is locked by another process (pid {pid}); try again after it finishes")]
    Busy { object_id: i64, pid: u32 },

    #[error("could not acquire lock at {}; remove it if no dna process is running", path.display())]
    Unavailable { path: PathBuf },
}

/// Held lock; the file is removed on drop.
#[derive(Debug)]
pub struct ObjectLock {
    path: PathBuf,
}

impl ObjectLock {
    /// Wait up to 60 seconds for the lock on `object_id`.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Busy`] if a live process still holds it when the
    /// wait runs out, [`LockError::Unavailable`] if the file cannot be created
    /// or read.
    pub async fn acquire(lake_root: &Path, object_id: i64) -> Result<Self, LockError> {
        Self::acquire_within(lake_root, object_id, LOCK_WAIT_TIMEOUT).await
    }

    /// [`Self::acquire`] with an explicit wait bound.
    ///
    /// # Errors
    ///
    /// Same as [`Self::acquire`].
    pub async fn acquire_within(
        lake_root: &Path,
        object_id: i64,
        timeout: Duration,
    ) -> Result<Self, LockError> {
        let path = lock_path(lake_root, object_id);
        let started = Instant::now();

        loop {
            match try_acquire(&path) {
                Ok(lock) => {
                    tracing::debug!(object_id, path = %path.display(), "acquired object lock");
                    return Ok(lock);
                }
                Err(LockState::Stale(pid)) => {
                    tracing::warn!(object_id, pid, "removing stale object lock");
                    let _ = std::fs::remove_file(&path);
                    continue;
                }
                Err(LockState::HeldBy(pid)) if started.elapsed() >= timeout => {
                    return Err(LockError::Busy { object_id, pid });
                }
                Err(LockState::Unknown) if started.elapsed() >= timeout => {
                    return Err(LockError::Unavailable { path });
                }
                Err(_) => {}
            }
            tokio::time::sleep(LOCK_RETRY_DELAY.min(timeout)).await;
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ObjectLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// `<lake_root>/.locks/object-<id>.lock`.
#[must_use]
pub fn lock_path(lake_root: &Path, object_id: i64) -> PathBuf {
    lake_root
        .join(LOCK_DIR)
        .join(format!("object-{object_id}.lock"))
}

#[derive(Debug)]
enum LockState {
    HeldBy(u32),
    Stale(u32),
    Unknown,
}

fn try_acquire(path: &Path) -> Result<ObjectLock, LockState> {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(mut file) => {
            let _ = writeln!(file, "{}", std::process::id());
            Ok(ObjectLock {
                path: path.to_path_buf(),
            })
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            let mut contents = String::new();
            if OpenOptions::new()
                .read(true)
                .open(path)
                .and_then(|mut file| file.read_to_string(&mut contents))
                .is_err()
            {
                return Err(LockState::Unknown);
            }

            match contents.trim().parse::<u32>().ok() {
                Some(pid) if is_process_running(pid) => Err(LockState::HeldBy(pid)),
                Some(pid) => Err(LockState::Stale(pid)),
                None => Err(LockState::Unknown),
            }
        }
        Err(_) => Err(LockState::Unknown),
    }
}

fn is_process_running(pid: u32) -> bool {
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}
