// src/db/models/local_repo.rs

//! LocalRepo model - locally managed package repositories
//!
//! Mirrors refer to local repos by UUID when their filter should also
//! consider the packages a local repo holds.

use crate::error::{Error, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

/// A locally managed package repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepo {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub comment: Option<String>,
    pub created_at: Option<String>,
}

impl LocalRepo {
    /// Create a new LocalRepo with a fresh UUID
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            uuid: Uuid::new_v4().to_string(),
            name,
            comment: None,
            created_at: None,
        }
    }

    /// Insert this repo into the database
    pub fn insert(&mut self, conn: &Connection) -> Result<i64> {
        if Self::find_by_name(conn, &self.name)?.is_some() {
            return Err(Error::Conflict(format!(
                "local repo with name {} already exists",
                self.name
            )));
        }

        conn.execute(
            "INSERT INTO local_repos (uuid, name, comment) VALUES (?1, ?2, ?3)",
            params![&self.uuid, &self.name, &self.comment],
        )?;

        let id = conn.last_insert_rowid();
        self.id = Some(id);
        Ok(id)
    }

    /// Find a repo by name
    pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, comment, created_at FROM local_repos WHERE name = ?1",
        )?;
        Ok(stmt.query_row([name], Self::from_row).optional()?)
    }

    /// Find a repo by UUID
    pub fn find_by_uuid(conn: &Connection, uuid: &str) -> Result<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, comment, created_at FROM local_repos WHERE uuid = ?1",
        )?;
        Ok(stmt.query_row([uuid], Self::from_row).optional()?)
    }

    /// List all repos ordered by name
    pub fn list_all(conn: &Connection) -> Result<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, uuid, name, comment, created_at FROM local_repos ORDER BY name",
        )?;

        let repos = stmt
            .query_map([], Self::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(repos)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get(0)?),
            uuid: row.get(1)?,
            name: row.get(2)?,
            comment: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}
