// src/commands/mirror.rs
//! Mirror management commands

use anyhow::{Context, Result};
use mirrorctl::{Config, Error};
use mirrorctl::db::models::{LocalRepo, RemoteMirror};
use mirrorctl::mirror::{HttpIndexFetcher, MirrorChangeset, MirrorEditor, NewMirror, create_mirror};
use rusqlite::Connection;
use tracing::info;

/// Create a mirror
pub fn cmd_mirror_create(config: &Config, settings: NewMirror) -> Result<()> {
    info!("Creating mirror: {} ({})", settings.name, settings.archive_root);
    let conn = mirrorctl::db::open(&config.db_path)?;
    let fetcher = HttpIndexFetcher::new(&config.fetch)?;

    let mirror = create_mirror(&conn, &fetcher, settings).context("unable to create mirror")?;
    println!("Mirror {mirror} successfully added.");
    Ok(())
}

/// Edit mirror settings
pub fn cmd_mirror_edit(config: &Config, name: &str, changes: MirrorChangeset) -> Result<()> {
    info!("Editing mirror: {}", name);
    let mut conn = mirrorctl::db::open(&config.db_path).map_err(Error::edit)?;
    let fetcher = HttpIndexFetcher::new(&config.fetch).map_err(Error::edit)?;
    let editor = MirrorEditor::new(config.lock_dir(), &fetcher);

    let outcome = editor.edit(&mut conn, name, &changes)?;
    println!("Mirror {} successfully updated.", outcome.mirror);
    Ok(())
}

/// List mirrors
pub fn cmd_mirror_list(config: &Config) -> Result<()> {
    let conn = mirrorctl::db::open(&config.db_path)?;
    let mirrors = RemoteMirror::list_all(&conn)?;

    if mirrors.is_empty() {
        println!("No mirrors found, create one with `mirrorctl mirror create`.");
        return Ok(());
    }

    println!("List of mirrors:");
    for mirror in mirrors {
        println!(" * {mirror}");
    }
    Ok(())
}

/// Show mirror details
pub fn cmd_mirror_show(config: &Config, name: &str) -> Result<()> {
    let conn = mirrorctl::db::open(&config.db_path)?;
    let mirror = RemoteMirror::find_by_name(&conn, name)?
        .ok_or_else(|| anyhow::anyhow!("mirror with name {} not found", name))?;

    let yes_no = |flag: bool| if flag { "yes" } else { "no" };

    println!("Name: {}", mirror.name);
    println!("UUID: {}", mirror.uuid);
    println!("Archive Root URL: {}", mirror.archive_root);
    println!("Distribution: {}", mirror.distribution);
    println!("Components: {}", mirror.components.join(", "));
    println!("Architectures: {}", mirror.architectures.join(", "));
    println!("Download Sources: {}", yes_no(mirror.download_sources));
    println!("Download .udebs: {}", yes_no(mirror.download_udebs));
    if mirror.filter.is_empty() {
        println!("Filter: none");
    } else {
        println!("Filter: {}", mirror.filter);
        println!("Filter With Deps: {}", yes_no(mirror.filter_with_deps));
    }
    println!(
        "Packages From Repos: {}",
        reference_names(&conn, &mirror.packages_from_repos, |conn, uuid| {
            Ok(LocalRepo::find_by_uuid(conn, uuid)?.map(|r| r.name))
        })?
    );
    println!(
        "Packages From Mirrors: {}",
        reference_names(&conn, &mirror.packages_from_mirrors, |conn, uuid| {
            Ok(RemoteMirror::find_by_uuid(conn, uuid)?.map(|m| m.name))
        })?
    );
    println!(
        "Last update: {}",
        mirror.last_fetch.as_deref().unwrap_or("never")
    );

    if let Some(release) = &mirror.release {
        println!("Information from release file:");
        for (key, value) in &release.fields {
            // Checksum lists are long and not useful here
            if value.contains('\n') {
                continue;
            }
            println!("{key}: {value}");
        }
    }
    Ok(())
}

/// Render referenced UUIDs by their current names
fn reference_names<F>(conn: &Connection, uuids: &[String], lookup: F) -> Result<String>
where
    F: Fn(&Connection, &str) -> mirrorctl::Result<Option<String>>,
{
    if uuids.is_empty() {
        return Ok("none".to_string());
    }

    let names = uuids
        .iter()
        .map(|uuid| -> Result<String> {
            Ok(lookup(conn, uuid)?.unwrap_or_else(|| format!("<missing {uuid}>")))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_setup_failure_keeps_edit_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config {
            db_path: temp.path().join("absent.db").to_str().unwrap().to_string(),
            ..Config::default()
        };

        let err = cmd_mirror_edit(&config, "nginx-mirror", MirrorChangeset::new()).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("unable to edit: database not found at")
        );
    }
}
