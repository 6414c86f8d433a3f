// src/commands/repo.rs
//! Local repository commands

use anyhow::Result;
use mirrorctl::Config;
use mirrorctl::db::models::LocalRepo;
use tracing::info;

/// Create a local repository
pub fn cmd_repo_create(config: &Config, name: &str, comment: Option<String>) -> Result<()> {
    info!("Creating local repo: {}", name);
    let conn = mirrorctl::db::open(&config.db_path)?;

    let mut repo = LocalRepo::new(name.to_string());
    repo.comment = comment;
    repo.insert(&conn)?;

    println!("Local repo {} successfully added.", repo.name);
    Ok(())
}

/// List local repositories
pub fn cmd_repo_list(config: &Config) -> Result<()> {
    let conn = mirrorctl::db::open(&config.db_path)?;
    let repos = LocalRepo::list_all(&conn)?;

    if repos.is_empty() {
        println!("No local repositories found, create one with `mirrorctl repo create`.");
        return Ok(());
    }

    println!("List of local repos:");
    for repo in repos {
        match &repo.comment {
            Some(comment) => println!(" * [{}]: {}", repo.name, comment),
            None => println!(" * [{}]", repo.name),
        }
    }
    Ok(())
}
