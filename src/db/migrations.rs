// src/db/migrations.rs
//! Database migration implementations
//!
//! Each function upgrades the schema by exactly one version.

use crate::error::Result;
use rusqlite::Connection;
use tracing::debug;

/// Initial schema - Version 1
///
/// Creates:
/// - local_repos: Locally managed package repositories
/// - remote_mirrors: Mirrors of remote archives with their filter/download settings
/// - mirror_references: Ordered repo/mirror UUID lists feeding a mirror's filter
pub fn migrate_v1(conn: &Connection) -> Result<()> {
    debug!("Creating schema version 1");

    conn.execute_batch(
        "
        CREATE TABLE local_repos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL UNIQUE,
            comment TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE remote_mirrors (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL UNIQUE,
            archive_root TEXT NOT NULL,
            distribution TEXT NOT NULL,
            components TEXT NOT NULL DEFAULT '[]',
            architectures TEXT NOT NULL DEFAULT '[]',
            filter TEXT NOT NULL DEFAULT '',
            filter_with_deps INTEGER NOT NULL DEFAULT 0,
            download_sources INTEGER NOT NULL DEFAULT 0,
            download_udebs INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'idle' CHECK(status IN ('idle', 'updating')),
            release_meta TEXT,
            last_fetch TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        -- Positions keep the caller's order; duplicates are allowed on purpose
        CREATE TABLE mirror_references (
            mirror_id INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('repo', 'mirror')),
            position INTEGER NOT NULL,
            target_uuid TEXT NOT NULL,
            PRIMARY KEY (mirror_id, kind, position),
            FOREIGN KEY (mirror_id) REFERENCES remote_mirrors(id) ON DELETE CASCADE
        );

        CREATE INDEX idx_mirror_references_target ON mirror_references(target_uuid);
        ",
    )?;

    Ok(())
}
