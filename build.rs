// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Boolean edit option: bare flag means true, `--opt=false` turns it off
fn edit_bool_arg(name: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(long)
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value("true")
        .value_name("BOOL")
        .help(help)
}

fn build_cli() -> Command {
    Command::new("mirrorctl")
        .version(env!("CARGO_PKG_VERSION"))
        .author("mirrorctl Contributors")
        .about("Manage Debian-style repository mirrors")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .global(true)
                .help("Configuration file"),
        )
        .arg(
            Arg::new("db_path")
                .short('d')
                .long("db-path")
                .value_name("PATH")
                .global(true)
                .help("Database path (overrides the configuration file)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase log verbosity"),
        )
        .subcommand(Command::new("init").about("Initialize the mirrorctl database"))
        .subcommand(
            Command::new("mirror")
                .about("Remote mirror management")
                .subcommand(
                    Command::new("create")
                        .about("Create a mirror of a remote archive")
                        .arg(Arg::new("name").required(true).help("Mirror name"))
                        .arg(Arg::new("archive_url").required(true).help("Archive root URL"))
                        .arg(Arg::new("distribution").required(true).help("Distribution"))
                        .arg(Arg::new("components").num_args(0..).help("Components to mirror"))
                        .arg(Arg::new("architectures").long("architectures").help("Comma separated architectures"))
                        .arg(Arg::new("filter").long("filter").help("Filter packages in mirror"))
                        .arg(Arg::new("filter_with_deps").long("filter-with-deps").action(ArgAction::SetTrue).help("Include dependencies of filtered packages"))
                        .arg(Arg::new("with_sources").long("with-sources").action(ArgAction::SetTrue).help("Download source packages"))
                        .arg(Arg::new("with_udebs").long("with-udebs").action(ArgAction::SetTrue).help("Download .udeb packages")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit mirror settings")
                        .arg(Arg::new("name").required(true).help("Mirror name"))
                        .arg(Arg::new("filter").long("filter").help("Filter packages in mirror"))
                        .arg(edit_bool_arg("filter_with_deps", "filter-with-deps", "Include dependencies of filtered packages"))
                        .arg(edit_bool_arg("with_sources", "with-sources", "Download source packages"))
                        .arg(edit_bool_arg("with_udebs", "with-udebs", "Download .udeb packages"))
                        .arg(Arg::new("with_repo_packages").long("with-repo-packages").help("Local repos feeding the filter (comma separated)"))
                        .arg(Arg::new("with_mirror_packages").long("with-mirror-packages").help("Mirrors feeding the filter (comma separated)"))
                        .arg(Arg::new("architectures").long("architectures").help("Comma separated architectures; refreshes the index")),
                )
                .subcommand(Command::new("list").about("List mirrors"))
                .subcommand(
                    Command::new("show")
                        .about("Show mirror details")
                        .arg(Arg::new("name").required(true).help("Mirror name")),
                ),
        )
        .subcommand(
            Command::new("repo")
                .about("Local repository management")
                .subcommand(
                    Command::new("create")
                        .about("Create a local repository")
                        .arg(Arg::new("name").required(true).help("Repository name"))
                        .arg(Arg::new("comment").long("comment").help("Free-form description")),
                )
                .subcommand(Command::new("list").about("List local repositories")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("mirrorctl.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
