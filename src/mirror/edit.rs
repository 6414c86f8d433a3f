// src/mirror/edit.rs

//! Mirror edit orchestration
//!
//! An edit runs these stages in order, stopping at the first failure:
//!
//! ```text
//! LookupEntity -> AcquireLock -> Mutate -> ValidateInvariants
//!     -> ConditionalRefetch -> Commit
//! ```
//!
//! Everything before `Commit` works on an in-memory candidate. The commit is
//! one SQLite transaction replacing the mirror row and its references, so the
//! store ends up holding either the whole candidate or exactly what it held
//! before. Nothing is retried here.

use super::changeset::MirrorChangeset;
use super::fetch::IndexFetcher;
use super::lock::{MirrorLock, ensure_idle};
use super::mutator::{apply_changeset, check_invariants};
use super::refetch::refetch_if_requested;
use crate::db;
use crate::db::models::RemoteMirror;
use crate::error::{Error, Result};
use rusqlite::Connection;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Stage of an edit, used in log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditStage {
    LookupEntity,
    AcquireLock,
    Mutate,
    ValidateInvariants,
    ConditionalRefetch,
    Commit,
}

impl fmt::Display for EditStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditStage::LookupEntity => "lookup",
            EditStage::AcquireLock => "lock",
            EditStage::Mutate => "mutate",
            EditStage::ValidateInvariants => "validate",
            EditStage::ConditionalRefetch => "refetch",
            EditStage::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Result of a successful edit
#[derive(Debug, Clone)]
pub struct EditOutcome {
    /// The committed mirror
    pub mirror: RemoteMirror,
    /// Whether the remote index was refreshed
    pub refreshed: bool,
}

/// Applies changesets to mirrors
pub struct MirrorEditor<'a> {
    lock_dir: PathBuf,
    fetcher: &'a dyn IndexFetcher,
}

impl<'a> MirrorEditor<'a> {
    pub fn new(lock_dir: impl Into<PathBuf>, fetcher: &'a dyn IndexFetcher) -> Self {
        Self {
            lock_dir: lock_dir.into(),
            fetcher,
        }
    }

    /// Edit the mirror called `name`
    ///
    /// Errors come back as [`Error::Edit`] wrapping the cause.
    pub fn edit(
        &self,
        conn: &mut Connection,
        name: &str,
        changes: &MirrorChangeset,
    ) -> Result<EditOutcome> {
        self.run(conn, name, changes).map_err(Error::edit)
    }

    fn run(
        &self,
        conn: &mut Connection,
        name: &str,
        changes: &MirrorChangeset,
    ) -> Result<EditOutcome> {
        let fail = |stage: EditStage| {
            move |err: Error| {
                warn!("Edit of mirror {} failed during {}: {}", name, stage, err);
                err
            }
        };

        debug!("[{}] mirror {}", EditStage::LookupEntity, name);
        let found = RemoteMirror::find_by_name(conn, name)
            .and_then(|m| {
                m.ok_or_else(|| Error::NotFound(format!("mirror with name {name} not found")))
            })
            .map_err(fail(EditStage::LookupEntity))?;

        debug!("[{}] mirror {}", EditStage::AcquireLock, name);
        let _lock = MirrorLock::try_acquire(&self.lock_dir, &found)
            .map_err(fail(EditStage::AcquireLock))?;

        // Another writer may have committed, or started an update, between lookup and lock
        let current = RemoteMirror::find_by_uuid(conn, &found.uuid)
            .and_then(|m| {
                m.ok_or_else(|| Error::NotFound(format!("mirror with name {name} not found")))
            })
            .and_then(|m| ensure_idle(&m).map(|()| m))
            .map_err(fail(EditStage::AcquireLock))?;

        debug!("[{}] mirror {}", EditStage::Mutate, name);
        let mut candidate =
            apply_changeset(conn, &current, changes).map_err(fail(EditStage::Mutate))?;

        debug!("[{}] mirror {}", EditStage::ValidateInvariants, name);
        check_invariants(&candidate).map_err(fail(EditStage::ValidateInvariants))?;

        debug!("[{}] mirror {}", EditStage::ConditionalRefetch, name);
        let refreshed = refetch_if_requested(self.fetcher, &mut candidate, changes)
            .map_err(fail(EditStage::ConditionalRefetch))?;

        debug!("[{}] mirror {}", EditStage::Commit, name);
        db::transaction(conn, |tx| candidate.update(tx))
            .map_err(into_store_error)
            .map_err(fail(EditStage::Commit))?;

        info!(
            "Mirror {} updated{}",
            candidate.name,
            if refreshed { " (index refreshed)" } else { "" }
        );
        Ok(EditOutcome {
            mirror: candidate,
            refreshed,
        })
    }
}

fn into_store_error(err: Error) -> Error {
    match err {
        Error::Database(e) => Error::Store(e.to_string()),
        Error::Json(e) => Error::Store(e.to_string()),
        other => other,
    }
}
