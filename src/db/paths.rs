// src/db/paths.rs
//! Centralized path derivation for mirrorctl directories

use std::path::{Path, PathBuf};

/// Default database location
pub const DEFAULT_DB_PATH: &str = "/var/lib/mirrorctl/mirrorctl.db";

/// Get the directory containing the database
pub fn db_dir(db_path: &str) -> PathBuf {
    match Path::new(db_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        Some(_) => PathBuf::from("."),
        None => PathBuf::from("/var/lib/mirrorctl"),
    }
}

/// Get the directory holding per-mirror lock files
pub fn lock_dir(db_path: &str) -> PathBuf {
    db_dir(db_path).join("locks")
}

/// Lock file for a single mirror, keyed by its UUID so renames don't matter
pub fn mirror_lock_path(lock_dir: &Path, mirror_uuid: &str) -> PathBuf {
    lock_dir.join(format!("mirror-{mirror_uuid}.lock"))
}
