// src/db/mod.rs

//! SQLite persistence for mirrors and local repositories
//!
//! All state lives in one database file. Schema creation and upgrades go
//! through [`schema::migrate`]; multi-statement writes go through
//! [`transaction`] so they either land completely or not at all.

pub mod migrations;
pub mod models;
pub mod paths;
pub mod schema;

use crate::error::{Error, Result};
use rusqlite::{Connection, Transaction};
use std::fs;
use std::path::Path;
use tracing::info;

/// Create the database (and its parent directory) and bring the schema up to date
pub fn init(db_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = connect(db_path)?;
    schema::migrate(&conn)?;
    info!("Database initialized at {}", db_path);
    Ok(())
}

/// Open an existing database with foreign keys enforced
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        return Err(Error::NotFound(format!(
            "database not found at {db_path} (run `mirrorctl init` first)"
        )));
    }
    connect(db_path)
}

fn connect(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
    Ok(conn)
}

/// Run `f` inside a transaction, committing only if it succeeds
pub fn transaction<T, F>(conn: &mut Connection, f: F) -> Result<T>
where
    F: FnOnce(&Transaction) -> Result<T>,
{
    let tx = conn.transaction()?;
    let value = f(&tx)?;
    tx.commit()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_parent_directory() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("nested/dir/mirrorctl.db");
        let db_path = db_path.to_str().unwrap();

        init(db_path).unwrap();
        let conn = open(db_path).unwrap();
        assert_eq!(schema::get_schema_version(&conn).unwrap(), schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_open_missing_database() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("absent.db");
        let err = open(db_path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, crate::Error::NotFound(_)));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("mirrorctl.db");
        let db_path = db_path.to_str().unwrap();
        init(db_path).unwrap();
        let mut conn = open(db_path).unwrap();

        let result: Result<()> = transaction(&mut conn, |tx| {
            tx.execute(
                "INSERT INTO local_repos (uuid, name) VALUES ('u-1', 'main')",
                [],
            )?;
            Err(crate::Error::Store("boom".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM local_repos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
