// src/mirror/mutator.rs

//! Build a candidate mirror from the current one plus a changeset
//!
//! The current value is never modified. The candidate is a fresh clone that
//! the caller either commits whole or drops.

use super::changeset::MirrorChangeset;
use super::filter::validate_filter;
use super::resolver::resolve_references;
use crate::db::models::RemoteMirror;
use crate::error::{Error, ReferenceKind, Result};
use rusqlite::Connection;

/// Apply the requested fields in a fixed order
///
/// Order: filter, filter-with-deps, download-sources, download-udebs,
/// repo references, mirror references.
pub fn apply_changeset(
    conn: &Connection,
    current: &RemoteMirror,
    changes: &MirrorChangeset,
) -> Result<RemoteMirror> {
    let mut candidate = current.clone();

    if let Some(filter) = &changes.filter {
        candidate.filter = filter.clone();
    }
    if let Some(with_deps) = changes.filter_with_deps {
        candidate.filter_with_deps = with_deps;
    }
    if let Some(sources) = changes.download_sources {
        candidate.download_sources = sources;
    }
    if let Some(udebs) = changes.download_udebs {
        candidate.download_udebs = udebs;
    }
    if let Some(names) = &changes.repo_references {
        candidate.packages_from_repos = resolve_references(conn, ReferenceKind::LocalRepo, names)?;
    }
    if let Some(names) = &changes.mirror_references {
        candidate.packages_from_mirrors = resolve_references(conn, ReferenceKind::Mirror, names)?;
    }

    Ok(candidate)
}

/// Invariants every committed mirror satisfies
pub fn check_invariants(candidate: &RemoteMirror) -> Result<()> {
    if candidate.is_flat() && candidate.download_udebs {
        return Err(Error::InvariantViolation(
            "flat mirrors don't support udebs".to_string(),
        ));
    }

    validate_filter(&candidate.filter)
}
