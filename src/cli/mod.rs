// src/cli/mod.rs
//! CLI definitions for mirrorctl
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Management contexts:
//! - `mirror` - Remote mirror management (create, edit, list, show)
//! - `repo` - Local repository management

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod mirror;
mod repo;

pub use mirror::{MirrorCommands, edit_changeset};
pub use repo::RepoCommands;

#[derive(Parser)]
#[command(name = "mirrorctl")]
#[command(author = "mirrorctl Contributors")]
#[command(version)]
#[command(about = "Manage Debian-style repository mirrors", long_about = None)]
pub struct Cli {
    /// Configuration file (default: $MIRRORCTL_CONFIG or /etc/mirrorctl/mirrorctl.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the database file (overrides the configuration file)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub db_path: Option<String>,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the mirrorctl database
    Init,

    /// Remote mirror management
    #[command(subcommand)]
    Mirror(MirrorCommands),

    /// Local repository management
    #[command(subcommand)]
    Repo(RepoCommands),
}
