// src/cli/mirror.rs
//! Remote mirror management commands

use clap::Subcommand;
use mirrorctl::mirror::{MirrorChangeset, parse_architecture_list};

#[derive(Subcommand)]
pub enum MirrorCommands {
    /// Create a mirror of a remote archive
    ///
    /// The archive's Release file is downloaded once to check that the
    /// distribution, components and architectures exist.
    Create {
        /// Mirror name
        name: String,

        /// Archive root URL, e.g. http://deb.debian.org/debian/
        archive_url: String,

        /// Distribution (a path ending in `/` such as `./` creates a flat mirror)
        distribution: String,

        /// Components to mirror (default: all the archive offers)
        components: Vec<String>,

        /// Comma separated architectures (default: all the archive offers)
        #[arg(long, value_name = "ARCHS")]
        architectures: Option<String>,

        /// Filter packages in mirror
        #[arg(long)]
        filter: Option<String>,

        /// When filtering, include dependencies of matching packages as well
        #[arg(long)]
        filter_with_deps: bool,

        /// Download source packages in addition to binary packages
        #[arg(long)]
        with_sources: bool,

        /// Download .udeb packages (Debian installer support)
        #[arg(long)]
        with_udebs: bool,
    },

    /// Edit mirror settings
    ///
    /// Only the options given are changed. Boolean options accept an
    /// explicit value (`--with-udebs=false`); on their own they mean true.
    /// Changing architectures refreshes the mirror's index before saving.
    ///
    /// Example:
    ///
    ///   mirrorctl mirror edit --filter=nginx --filter-with-deps some-mirror
    Edit {
        /// Mirror name
        name: String,

        /// Filter packages in mirror (empty string disables filtering)
        #[arg(long)]
        filter: Option<String>,

        /// When filtering, include dependencies of matching packages as well
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
        filter_with_deps: Option<bool>,

        /// Download source packages in addition to binary packages
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
        with_sources: Option<bool>,

        /// Download .udeb packages (Debian installer support)
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_name = "BOOL")]
        with_udebs: Option<bool>,

        /// When filtering, include packages contained in local repos (comma separated, empty clears)
        #[arg(long, value_name = "REPOS")]
        with_repo_packages: Option<String>,

        /// When filtering, include packages contained in mirrors (comma separated, empty clears)
        #[arg(long, value_name = "MIRRORS")]
        with_mirror_packages: Option<String>,

        /// Comma separated list of architectures to track
        #[arg(long, value_name = "ARCHS")]
        architectures: Option<String>,
    },

    /// List mirrors
    List,

    /// Show mirror details
    Show {
        /// Mirror name
        name: String,
    },
}

/// Build a changeset from the options present on the command line
#[allow(clippy::too_many_arguments)]
pub fn edit_changeset(
    filter: Option<String>,
    filter_with_deps: Option<bool>,
    with_sources: Option<bool>,
    with_udebs: Option<bool>,
    with_repo_packages: Option<String>,
    with_mirror_packages: Option<String>,
    architectures: Option<String>,
) -> MirrorChangeset {
    MirrorChangeset {
        filter,
        filter_with_deps,
        download_sources: with_sources,
        download_udebs: with_udebs,
        repo_references: with_repo_packages,
        mirror_references: with_mirror_packages,
        architectures: architectures.as_deref().map(parse_architecture_list),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn parse_edit(args: &[&str]) -> MirrorChangeset {
        let mut argv = vec!["mirrorctl", "mirror", "edit"];
        argv.extend_from_slice(args);
        match Cli::parse_from(argv).command {
            Commands::Mirror(MirrorCommands::Edit {
                filter,
                filter_with_deps,
                with_sources,
                with_udebs,
                with_repo_packages,
                with_mirror_packages,
                architectures,
                ..
            }) => edit_changeset(
                filter,
                filter_with_deps,
                with_sources,
                with_udebs,
                with_repo_packages,
                with_mirror_packages,
                architectures,
            ),
            _ => panic!("expected mirror edit"),
        }
    }

    #[test]
    fn test_absent_flags_are_absent() {
        assert!(parse_edit(&["nginx-mirror"]).is_empty());
    }

    #[test]
    fn test_bare_bool_flag_means_true() {
        let changes = parse_edit(&["--filter=nginx", "--filter-with-deps", "nginx-mirror"]);
        assert_eq!(changes.filter.as_deref(), Some("nginx"));
        assert_eq!(changes.filter_with_deps, Some(true));
        assert_eq!(changes.download_udebs, None);
    }

    #[test]
    fn test_explicit_false() {
        let changes = parse_edit(&["--with-udebs=false", "nginx-mirror"]);
        assert_eq!(changes.download_udebs, Some(false));
    }

    #[test]
    fn test_empty_reference_list_clears() {
        let changes = parse_edit(&["--with-repo-packages", "", "nginx-mirror"]);
        assert_eq!(changes.repo_references.as_deref(), Some(""));
    }

    #[test]
    fn test_architectures_split() {
        let changes = parse_edit(&["--architectures", "amd64,arm64", "nginx-mirror"]);
        assert_eq!(
            changes.architectures,
            Some(vec!["amd64".to_string(), "arm64".to_string()])
        );
    }
}
