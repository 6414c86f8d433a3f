// src/mirror/resolver.rs

//! Name-to-UUID resolution for mirror cross-references

use crate::db::models::{LocalRepo, RemoteMirror};
use crate::error::{Error, ReferenceKind, Result};
use rusqlite::Connection;
use tracing::debug;

/// Resolve a comma-separated list of names to UUIDs
///
/// Order and duplicates are preserved as given. Resolution stops at the first
/// unknown name. An empty (or all-whitespace) list resolves to no references.
pub fn resolve_references(
    conn: &Connection,
    kind: ReferenceKind,
    names: &str,
) -> Result<Vec<String>> {
    if names.trim().is_empty() {
        return Ok(Vec::new());
    }

    names
        .split(',')
        .map(|name| resolve_one(conn, kind, name.trim()))
        .collect()
}

fn resolve_one(conn: &Connection, kind: ReferenceKind, name: &str) -> Result<String> {
    let uuid = match kind {
        ReferenceKind::LocalRepo => LocalRepo::find_by_name(conn, name)?.map(|r| r.uuid),
        ReferenceKind::Mirror => RemoteMirror::find_by_name(conn, name)?.map(|m| m.uuid),
    };

    let uuid = uuid.ok_or_else(|| Error::UnknownReference {
        kind,
        name: name.to_string(),
    })?;
    debug!("Resolved {} {} to {}", kind, name, uuid);
    Ok(uuid)
}
