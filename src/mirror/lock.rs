// src/mirror/lock.rs

//! Per-mirror exclusive edit lock
//!
//! A mirror is writable by one editor at a time. Two things can hold it:
//!
//! - **Update status**: a mirror whose persisted status is `updating` belongs
//!   to a running update operation.
//! - **Edit lock**: an advisory `flock(LOCK_EX)` on
//!   `<lock_dir>/mirror-<uuid>.lock`, held for the lifetime of [`MirrorLock`].
//!
//! Acquisition never waits. Contention is reported straight away as
//! [`Error::LockContention`].

use crate::db::models::{MirrorStatus, RemoteMirror};
use crate::db::paths;
use crate::error::{Error, Result};
use fs2::FileExt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive edit lock on one mirror, released on drop
#[derive(Debug)]
pub struct MirrorLock {
    file: File,
    path: PathBuf,
}

impl MirrorLock {
    /// Try to take the edit lock without blocking
    pub fn try_acquire(lock_dir: &Path, mirror: &RemoteMirror) -> Result<Self> {
        ensure_idle(mirror)?;

        fs::create_dir_all(lock_dir)?;
        let path = paths::mirror_lock_path(lock_dir, &mirror.uuid);
        let file = File::create(&path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!("Acquired edit lock for mirror {} at {:?}", mirror.name, path);
                Ok(Self { file, path })
            }
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.raw_os_error() == fs2::lock_contended_error().raw_os_error() =>
            {
                Err(Error::LockContention(format!(
                    "mirror {} is being edited by another process",
                    mirror.name
                )))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Fail with contention when an update operation owns the mirror
pub fn ensure_idle(mirror: &RemoteMirror) -> Result<()> {
    if mirror.status == MirrorStatus::Updating {
        return Err(Error::LockContention(format!(
            "mirror {} is locked by update operation",
            mirror.name
        )));
    }
    Ok(())
}

impl Drop for MirrorLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!("Failed to release edit lock at {:?}: {}", self.path, e);
        } else {
            debug!("Released edit lock at {:?}", self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mirror() -> RemoteMirror {
        RemoteMirror::new(
            "debian".to_string(),
            "http://deb.debian.org/debian/".to_string(),
            "bookworm".to_string(),
        )
    }

    #[test]
    fn test_second_acquire_is_contended() {
        let temp = TempDir::new().unwrap();
        let m = mirror();

        let lock = MirrorLock::try_acquire(temp.path(), &m).unwrap();
        assert!(lock.path().exists());

        let err = MirrorLock::try_acquire(temp.path(), &m).unwrap_err();
        assert!(matches!(err, Error::LockContention(_)));
    }

    #[test]
    fn test_released_on_drop() {
        let temp = TempDir::new().unwrap();
        let m = mirror();

        drop(MirrorLock::try_acquire(temp.path(), &m).unwrap());
        MirrorLock::try_acquire(temp.path(), &m).unwrap();
    }

    #[test]
    fn test_locks_are_per_mirror() {
        let temp = TempDir::new().unwrap();
        let _a = MirrorLock::try_acquire(temp.path(), &mirror()).unwrap();
        let _b = MirrorLock::try_acquire(temp.path(), &mirror()).unwrap();
    }

    #[test]
    fn test_updating_status_is_contention() {
        let temp = TempDir::new().unwrap();
        let mut m = mirror();
        m.status = MirrorStatus::Updating;

        let err = MirrorLock::try_acquire(temp.path(), &m).unwrap_err();
        assert_eq!(err.to_string(), "mirror debian is locked by update operation");
    }

    #[test]
    fn test_ensure_idle() {
        let mut m = mirror();
        ensure_idle(&m).unwrap();

        m.status = MirrorStatus::Updating;
        assert!(matches!(ensure_idle(&m), Err(Error::LockContention(_))));
    }

    #[test]
    fn test_creates_lock_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("nested/locks");
        let lock = MirrorLock::try_acquire(&dir, &mirror()).unwrap();
        assert!(lock.path().starts_with(&dir));
    }
}
