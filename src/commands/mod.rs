// src/commands/mod.rs
//! Command handlers for the mirrorctl CLI

mod mirror;
mod repo;

pub use mirror::{cmd_mirror_create, cmd_mirror_edit, cmd_mirror_list, cmd_mirror_show};
pub use repo::{cmd_repo_create, cmd_repo_list};

use anyhow::Result;
use mirrorctl::Config;
use tracing::info;

/// Initialize the database
pub fn cmd_init(config: &Config) -> Result<()> {
    info!("Initializing mirrorctl database at: {}", config.db_path);
    mirrorctl::db::init(&config.db_path)?;
    println!("Database initialized successfully at: {}", config.db_path);
    Ok(())
}
