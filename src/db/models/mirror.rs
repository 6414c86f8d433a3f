// src/db/models/mirror.rs

//! RemoteMirror model - mirrors of remote package archives
//!
//! The mirror row holds scalar settings; the ordered repo/mirror reference
//! lists live in `mirror_references` and are loaded alongside the row.

use crate::error::{Error, Result};
use crate::mirror::ReleaseIndex;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, uuid, name, archive_root, distribution, components,
    architectures, filter, filter_with_deps, download_sources, download_udebs, status,
    release_meta, last_fetch, created_at FROM remote_mirrors";

/// Mirror status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorStatus {
    #[default]
    Idle,
    /// An update operation owns the mirror; set through `RemoteMirror::set_status`
    Updating,
}

impl MirrorStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MirrorStatus::Idle => "idle",
            MirrorStatus::Updating => "updating",
        }
    }
}

impl FromStr for MirrorStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "idle" => Ok(MirrorStatus::Idle),
            "updating" => Ok(MirrorStatus::Updating),
            _ => Err(format!("Invalid mirror status: {s}")),
        }
    }
}

/// A mirror of a remote package archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMirror {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub archive_root: String,
    pub distribution: String,
    pub components: Vec<String>,
    pub architectures: Vec<String>,
    pub filter: String,
    pub filter_with_deps: bool,
    pub download_sources: bool,
    pub download_udebs: bool,
    /// UUIDs of local repos whose packages feed the filter
    pub packages_from_repos: Vec<String>,
    /// UUIDs of other mirrors whose packages feed the filter
    pub packages_from_mirrors: Vec<String>,
    pub status: MirrorStatus,
    /// Index metadata from the last successful refresh
    pub release: Option<ReleaseIndex>,
    pub last_fetch: Option<String>,
    pub created_at: Option<String>,
}

impl RemoteMirror {
    /// Create a new mirror with a fresh UUID
    pub fn new(name: String, archive_root: String, distribution: String) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4().to_string(),
            name,
            archive_root,
            distribution,
            components: Vec::new(),
            architectures: Vec::new(),
            filter: String::new(),
            filter_with_deps: false,
            download_sources: false,
            download_udebs: false,
            packages_from_repos: Vec::new(),
            packages_from_mirrors: Vec::new(),
            status: MirrorStatus::Idle,
            release: None,
            last_fetch: None,
            created_at: None,
        }
    }

    /// Flat repositories have no `dists/` tree; the distribution is a path ending in `/`
    pub fn is_flat(&self) -> bool {
        self.distribution.ends_with('/')
    }

    /// Insert this mirror and its references
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        if Self::find_by_name(conn, &self.name)?.is_some() {
            return Err(Error::Conflict(format!(
                "mirror with name {} already exists",
                self.name
            )));
        }

        conn.execute(
            "INSERT INTO remote_mirrors (uuid, name, archive_root, distribution, components,
             architectures, filter, filter_with_deps, download_sources, download_udebs, status,
             release_meta, last_fetch)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &self.uuid,
                &self.name,
                &self.archive_root,
                &self.distribution,
                serde_json::to_string(&self.components)?,
                serde_json::to_string(&self.architectures)?,
                &self.filter,
                self.filter_with_deps as i32,
                self.download_sources as i32,
                self.download_udebs as i32,
                self.status.as_str(),
                self.release_json()?,
                &self.last_fetch,
            ],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        self.write_references(conn, id)?;
        Ok(id)
    }

    /// Find a mirror by name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE name = ?1"))?;
        let mirror = stmt.query_row([name], Self::from_row).optional()?;
        mirror.map(|m| m.with_references(conn)).transpose()
    }

    /// Find a mirror by UUID
    pub fn find_by_uuid(conn: &Connection, uuid: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE uuid = ?1"))?;
        let mirror = stmt.query_row([uuid], Self::from_row).optional()?;
        mirror.map(|m| m.with_references(conn)).transpose()
    }

    /// List all mirrors ordered by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY name"))?;
        let mirrors = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        mirrors
            .into_iter()
            .map(|m| m.with_references(conn))
            .collect()
    }

    /// Replace the stored row and reference lists with this value
    ///
    /// Run inside a transaction so the row and its references change together.
    /// Identity columns (`uuid`, `name`, `archive_root`, `distribution`) are part
    /// of the guard, not the update. `status` belongs to [`Self::set_status`];
    /// a mirror that is no longer idle is not overwritten.
    pub fn update(&self, conn: &Connection) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::Store(format!("mirror {} has no ID", self.name)))?;

        let changed = conn.execute(
            "UPDATE remote_mirrors SET components = ?1, architectures = ?2, filter = ?3,
             filter_with_deps = ?4, download_sources = ?5, download_udebs = ?6,
             release_meta = ?7, last_fetch = ?8
             WHERE id = ?9 AND uuid = ?10 AND status = ?11",
            params![
                serde_json::to_string(&self.components)?,
                serde_json::to_string(&self.architectures)?,
                &self.filter,
                self.filter_with_deps as i32,
                self.download_sources as i32,
                self.download_udebs as i32,
                self.release_json()?,
                &self.last_fetch,
                id,
                &self.uuid,
                MirrorStatus::Idle.as_str(),
            ],
        )?;

        if changed != 1 {
            return Err(Error::Store(format!(
                "mirror {} ({}) no longer exists or is being updated",
                self.name, self.uuid
            )));
        }

        conn.execute("DELETE FROM mirror_references WHERE mirror_id = ?1", [id])?;
        self.write_references(conn, id)?;
        Ok(())
    }

    /// Set the persisted status flag
    ///
    /// Only the mirror update operation moves a mirror to `updating` and back;
    /// editors treat that status as contention.
    pub fn set_status(&mut self, conn: &Connection, status: MirrorStatus) -> Result<()> {
        let id = self
            .id
            .ok_or_else(|| Error::Store(format!("mirror {} has no ID", self.name)))?;
        conn.execute(
            "UPDATE remote_mirrors SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        self.status = status;
        Ok(())
    }

    fn release_json(&self) -> Result<Option<String>> {
        Ok(self
            .release
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?)
    }

    fn write_references(&self, conn: &Connection, id: i64) -> Result<()> {
        let mut stmt = conn.prepare(
            "INSERT INTO mirror_references (mirror_id, kind, position, target_uuid)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for (kind, uuids) in [
            ("repo", &self.packages_from_repos),
            ("mirror", &self.packages_from_mirrors),
        ] {
            for (position, uuid) in uuids.iter().enumerate() {
                stmt.execute(params![id, kind, position as i64, uuid])?;
            }
        }
        Ok(())
    }

    fn with_references(mut self, conn: &Connection) -> Result<Self> {
        let Some(id) = self.id else {
            return Ok(self);
        };

        let mut stmt = conn.prepare(
            "SELECT kind, target_uuid FROM mirror_references
             WHERE mirror_id = ?1 ORDER BY kind, position",
        )?;
        let rows = stmt.query_map([id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        self.packages_from_repos.clear();
        self.packages_from_mirrors.clear();
        for row in rows {
            let (kind, uuid) = row?;
            match kind.as_str() {
                "repo" => self.packages_from_repos.push(uuid),
                "mirror" => self.packages_from_mirrors.push(uuid),
                other => {
                    return Err(Error::Store(format!("unknown reference kind: {other}")));
                }
            }
        }
        Ok(self)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get(11)?;
        let release_meta: Option<String> = row.get(12)?;

        Ok(Self {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            name: row.get(2)?,
            archive_root: row.get(3)?,
            distribution: row.get(4)?,
            components: json_column(row, 5)?,
            architectures: json_column(row, 6)?,
            filter: row.get(7)?,
            filter_with_deps: row.get::<_, i32>(8)? != 0,
            download_sources: row.get::<_, i32>(9)? != 0,
            download_udebs: row.get::<_, i32>(10)? != 0,
            packages_from_repos: Vec::new(),
            packages_from_mirrors: Vec::new(),
            status: status.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(11, Type::Text, e.into())
            })?,
            release: release_meta
                .map(|json| serde_json::from_str(&json))
                .transpose()
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(e)))?,
            last_fetch: row.get(13)?,
            created_at: row.get(14)?,
        })
    }
}

fn json_column(row: &Row, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl fmt::Display for RemoteMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {} {}", self.name, self.archive_root, self.distribution)
    }
}
