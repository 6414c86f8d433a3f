// src/mirror/create.rs

//! Mirror creation
//!
//! Creation runs the same invariant checks as an edit and always refreshes
//! the index once, so a stored mirror is known to point at a real archive.

use super::fetch::IndexFetcher;
use super::mutator::check_invariants;
use super::refetch::normalize_architectures;
use crate::db::models::RemoteMirror;
use crate::error::{Error, Result};
use rusqlite::Connection;
use tracing::info;
use url::Url;

/// Settings for a new mirror
#[derive(Debug, Clone, Default)]
pub struct NewMirror {
    pub name: String,
    pub archive_root: String,
    pub distribution: String,
    pub components: Vec<String>,
    /// Empty means every architecture the archive offers
    pub architectures: Vec<String>,
    pub filter: String,
    pub filter_with_deps: bool,
    pub download_sources: bool,
    pub download_udebs: bool,
}

/// Validate, refresh, and persist a new mirror
pub fn create_mirror(
    conn: &Connection,
    fetcher: &dyn IndexFetcher,
    settings: NewMirror,
) -> Result<RemoteMirror> {
    if settings.name.trim().is_empty() {
        return Err(Error::InvariantViolation("mirror name can't be empty".to_string()));
    }
    if RemoteMirror::find_by_name(conn, &settings.name)?.is_some() {
        return Err(Error::Conflict(format!(
            "mirror with name {} already exists",
            settings.name
        )));
    }

    let url = Url::parse(&settings.archive_root).map_err(|e| {
        Error::InvariantViolation(format!("invalid archive URL {}: {e}", settings.archive_root))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvariantViolation(format!(
            "unsupported archive URL scheme: {}",
            url.scheme()
        )));
    }

    let mut mirror = RemoteMirror::new(settings.name, settings.archive_root, settings.distribution);
    mirror.components = settings.components;
    mirror.filter = settings.filter;
    mirror.filter_with_deps = settings.filter_with_deps;
    mirror.download_sources = settings.download_sources;
    mirror.download_udebs = settings.download_udebs;

    if mirror.is_flat() && !mirror.components.is_empty() {
        return Err(Error::InvariantViolation(
            "flat mirrors don't have components".to_string(),
        ));
    }
    check_invariants(&mirror)?;

    let requested = normalize_architectures(&settings.architectures);
    let index = fetcher.refresh(&mirror, &requested)?;

    mirror.architectures = if requested.is_empty() {
        // `all` packages ride along with every concrete architecture
        index
            .architectures
            .iter()
            .filter(|arch| arch.as_str() != "all")
            .cloned()
            .collect()
    } else {
        requested
    };
    if !mirror.is_flat() && mirror.components.is_empty() {
        mirror.components = index.components.clone();
    }
    mirror.last_fetch = Some(index.fetched_at.clone());
    mirror.release = Some(index);

    mirror.insert(conn)?;
    info!("Created mirror {}", mirror);
    Ok(mirror)
}
