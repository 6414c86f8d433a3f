// src/main.rs

use anyhow::Result;
use clap::Parser;
use mirrorctl::Config;
use mirrorctl::mirror::{NewMirror, parse_architecture_list};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MirrorCommands, RepoCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::discover(cli.config.as_deref())?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }

    match cli.command {
        Commands::Init => commands::cmd_init(&config),

        Commands::Mirror(mirror_cmd) => match mirror_cmd {
            MirrorCommands::Create {
                name,
                archive_url,
                distribution,
                components,
                architectures,
                filter,
                filter_with_deps,
                with_sources,
                with_udebs,
            } => commands::cmd_mirror_create(
                &config,
                NewMirror {
                    name,
                    archive_root: archive_url,
                    distribution,
                    components,
                    architectures: architectures
                        .as_deref()
                        .map(parse_architecture_list)
                        .unwrap_or_default(),
                    filter: filter.unwrap_or_default(),
                    filter_with_deps,
                    download_sources: with_sources,
                    download_udebs: with_udebs,
                },
            ),
            MirrorCommands::Edit {
                name,
                filter,
                filter_with_deps,
                with_sources,
                with_udebs,
                with_repo_packages,
                with_mirror_packages,
                architectures,
            } => {
                let changes = cli::edit_changeset(
                    filter,
                    filter_with_deps,
                    with_sources,
                    with_udebs,
                    with_repo_packages,
                    with_mirror_packages,
                    architectures,
                );
                commands::cmd_mirror_edit(&config, &name, changes)
            }
            MirrorCommands::List => commands::cmd_mirror_list(&config),
            MirrorCommands::Show { name } => commands::cmd_mirror_show(&config, &name),
        },

        Commands::Repo(repo_cmd) => match repo_cmd {
            RepoCommands::Create { name, comment } => {
                commands::cmd_repo_create(&config, &name, comment)
            }
            RepoCommands::List => commands::cmd_repo_list(&config),
        },
    }
}
