// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use mirrorctl::db;
use mirrorctl::db::models::{LocalRepo, RemoteMirror};
use mirrorctl::mirror::verify_release;
use mirrorctl::{Error, IndexFetcher, ReleaseIndex, Result};
use std::cell::RefCell;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a test database with two local repos and three mirrors.
///
/// - local repos: `main`, `backports`
/// - `nginx-mirror`: bookworm, component `nginx`, architecture amd64
/// - `debian`: bookworm, components main/contrib, architectures amd64/i386
/// - `flat-mirror`: flat (`./`), architecture amd64
///
/// Returns (TempDir, db_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_test_db() -> (TempDir, String) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_str()
        .unwrap()
        .to_string();

    db::init(&db_path).unwrap();
    let mut conn = db::open(&db_path).unwrap();

    db::transaction(&mut conn, |tx| {
        LocalRepo::new("main".to_string()).insert(tx)?;
        LocalRepo::new("backports".to_string()).insert(tx)?;

        let mut nginx = RemoteMirror::new(
            "nginx-mirror".to_string(),
            "http://nginx.org/packages/debian/".to_string(),
            "bookworm".to_string(),
        );
        nginx.components = vec!["nginx".to_string()];
        nginx.architectures = vec!["amd64".to_string()];
        nginx.insert(tx)?;

        let mut debian = RemoteMirror::new(
            "debian".to_string(),
            "http://deb.debian.org/debian/".to_string(),
            "bookworm".to_string(),
        );
        debian.components = vec!["main".to_string(), "contrib".to_string()];
        debian.architectures = vec!["amd64".to_string(), "i386".to_string()];
        debian.insert(tx)?;

        let mut flat = RemoteMirror::new(
            "flat-mirror".to_string(),
            "http://example.com/flat/".to_string(),
            "./".to_string(),
        );
        flat.architectures = vec!["amd64".to_string()];
        flat.insert(tx)?;

        Ok(())
    })
    .unwrap();

    (temp_dir, db_path)
}

/// Lock directory inside the test's temp dir
pub fn lock_dir(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("locks")
}

/// Current stored state of a mirror
pub fn load_mirror(db_path: &str, name: &str) -> RemoteMirror {
    let conn = db::open(db_path).unwrap();
    RemoteMirror::find_by_name(&conn, name).unwrap().unwrap()
}

pub fn local_repo_uuid(db_path: &str, name: &str) -> String {
    let conn = db::open(db_path).unwrap();
    LocalRepo::find_by_name(&conn, name).unwrap().unwrap().uuid
}

pub fn mirror_uuid(db_path: &str, name: &str) -> String {
    load_mirror(db_path, name).uuid
}

/// In-memory fetcher that records every refresh request
pub struct FakeFetcher {
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
    release: std::result::Result<ReleaseIndex, String>,
}

impl FakeFetcher {
    /// Succeeds with a Release advertising `architectures` and `components`
    pub fn offering(architectures: &[&str], components: &[&str]) -> Self {
        let mut release = ReleaseIndex::default();
        release.architectures = architectures.iter().map(|a| a.to_string()).collect();
        release.components = components.iter().map(|c| c.to_string()).collect();
        release
            .fields
            .insert("Codename".to_string(), "bookworm".to_string());
        release.fetched_at = "2026-10-17T12:00:00+00:00".to_string();

        Self {
            calls: RefCell::new(Vec::new()),
            release: Ok(release),
        }
    }

    /// Fails every refresh with `message`
    pub fn failing(message: &str) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            release: Err(message.to_string()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl IndexFetcher for FakeFetcher {
    fn refresh(&self, mirror: &RemoteMirror, architectures: &[String]) -> Result<ReleaseIndex> {
        self.calls
            .borrow_mut()
            .push((mirror.name.clone(), architectures.to_vec()));

        let release = self.release.clone().map_err(Error::Fetch)?;
        verify_release(mirror, architectures, &release)?;
        Ok(release)
    }
}
