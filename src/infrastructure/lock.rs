//! Install lock
//!
//! An exclusive advisory lock on a file inside the consumer's dependency
//! directory. Held for the duration of one batch install so two installs
//! never interleave, whether from two processes or two threads.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{SyncError, SyncResult};

/// Held lock; released on drop
#[derive(Debug)]
pub struct InstallLock {
    file: File,
    path: PathBuf,
}

impl InstallLock {
    /// Block until the lock at `lock_path` is acquired.
    pub fn acquire(lock_path: &Path) -> SyncResult<Self> {
        let lock_error = |source| SyncError::Lock {
            path: lock_path.to_path_buf(),
            source,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(lock_error)?;
        }

        let file = File::create(lock_path).map_err(lock_error)?;
        file.lock_exclusive().map_err(lock_error)?;
        tracing::debug!(path = %lock_path.display(), "acquired install lock");

        Ok(Self {
            file,
            path: lock_path.to_path_buf(),
        })
    }

    /// Try once without blocking; `None` when another holder exists.
    pub fn try_acquire(lock_path: &Path) -> SyncResult<Option<Self>> {
        let lock_error = |source| SyncError::Lock {
            path: lock_path.to_path_buf(),
            source,
        };

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).map_err(lock_error)?;
        }

        let file = File::create(lock_path).map_err(lock_error)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self {
                file,
                path: lock_path.to_path_buf(),
            })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(lock_error(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
