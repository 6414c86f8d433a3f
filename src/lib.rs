// src/lib.rs

//! mirrorctl
//!
//! Keeps the configuration of Debian-style repository mirrors: where they
//! come from, which packages they filter, which architectures they track and
//! which other repositories feed their filters.
//!
//! # Architecture
//!
//! - Database-first: mirrors and local repos live in SQLite
//! - Candidate-then-commit: edits build a new value in memory, validate it,
//!   and replace the stored mirror in one transaction
//! - Exclusive per-mirror edit locks that fail fast instead of waiting

pub mod config;
pub mod db;
mod error;
pub mod mirror;
pub mod query;

pub use config::{Config, FetchConfig};
pub use error::{Error, ReferenceKind, Result};
pub use mirror::{EditOutcome, IndexFetcher, MirrorChangeset, MirrorEditor, ReleaseIndex};
