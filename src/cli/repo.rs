// src/cli/repo.rs
//! Local repository management commands

use clap::Subcommand;

#[derive(Subcommand)]
pub enum RepoCommands {
    /// Create a local repository
    Create {
        /// Repository name
        name: String,

        /// Free-form description
        #[arg(long)]
        comment: Option<String>,
    },

    /// List local repositories
    List,
}
