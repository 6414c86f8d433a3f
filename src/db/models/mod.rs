// src/db/models/mod.rs

//! Data models for mirrorctl database entities

mod local_repo;
mod mirror;

pub use local_repo::LocalRepo;
pub use mirror::{MirrorStatus, RemoteMirror};
