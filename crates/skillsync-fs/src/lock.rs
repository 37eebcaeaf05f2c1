//! Singleton process lock for sync runs
//!
//! One sync run at a time: the lock file holds the owner PID and an fs2
//! advisory exclusive lock. The flock dies with its owner process, so a
//! lock left behind by a crashed run is reclaimed automatically on the
//! next acquisition; only a live owner causes contention.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Exclusive lock over a catalog, released on drop.
///
/// Holding a `SyncLock` is the precondition for mutating the catalog,
/// the mirrors, or the sync-state document.
#[derive(Debug)]
pub struct SyncLock {
    path: PathBuf,
    file: fs::File,
}

impl SyncLock {
    /// Acquire the lock, failing fast if another live process holds it.
    ///
    /// # Errors
    ///
    /// Returns `Error::LockHeld` with the owner PID when the lock is held
    /// by a running process, or `Error::Io` on filesystem failures.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        if file.try_lock_exclusive().is_err() {
            // Contention: report the recorded owner. If the owner had died,
            // the OS would have released its flock and we would have won.
            let mut pid = String::new();
            file.read_to_string(&mut pid).ok();
            let pid = pid.trim().to_string();
            return Err(Error::LockHeld {
                pid: if pid.is_empty() { "unknown".into() } else { pid },
                path: path.to_path_buf(),
            });
        }

        // We own the lock; stamp it with our PID for diagnostics.
        file.set_len(0).map_err(|e| Error::io(path, e))?;
        file.seek(SeekFrom::Start(0)).map_err(|e| Error::io(path, e))?;
        write!(file, "{}", std::process::id()).map_err(|e| Error::io(path, e))?;
        file.sync_all().map_err(|e| Error::io(path, e))?;

        tracing::debug!(path = %path.display(), pid = std::process::id(), "lock acquired");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SyncLock {
    fn drop(&mut self) {
        // Best effort: unlock and remove the file on every exit path.
        let _ = self.file.unlock();
        let _ = fs::remove_file(&self.path);
        tracing::debug!(path = %self.path.display(), "lock released");
    }
}
