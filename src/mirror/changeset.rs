// src/mirror/changeset.rs

//! Requested changes to a mirror's settings
//!
//! Every field is optional: `None` leaves the mirror's value untouched, so
//! "clear this" and "don't touch this" never collide. For reference lists
//! `Some("")` is a real request meaning "no references".

/// Set of edits to apply to a mirror
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorChangeset {
    pub filter: Option<String>,
    pub filter_with_deps: Option<bool>,
    pub download_sources: Option<bool>,
    pub download_udebs: Option<bool>,
    /// Comma-separated local repo names
    pub repo_references: Option<String>,
    /// Comma-separated mirror names
    pub mirror_references: Option<String>,
    /// New architecture set; triggers an index refresh
    pub architectures: Option<Vec<String>>,
}

impl MirrorChangeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn filter_with_deps(mut self, value: bool) -> Self {
        self.filter_with_deps = Some(value);
        self
    }

    pub fn download_sources(mut self, value: bool) -> Self {
        self.download_sources = Some(value);
        self
    }

    pub fn download_udebs(mut self, value: bool) -> Self {
        self.download_udebs = Some(value);
        self
    }

    pub fn repo_references(mut self, names: impl Into<String>) -> Self {
        self.repo_references = Some(names.into());
        self
    }

    pub fn mirror_references(mut self, names: impl Into<String>) -> Self {
        self.mirror_references = Some(names.into());
        self
    }

    pub fn architectures<I, S>(mut self, archs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.architectures = Some(archs.into_iter().map(Into::into).collect());
        self
    }

    /// True when nothing was requested
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Only a new architecture set forces a trip to the network
    pub fn requires_refetch(&self) -> bool {
        self.architectures.is_some()
    }
}

/// Split a comma-separated architecture list, dropping blanks
pub fn parse_architecture_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|arch| !arch.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(MirrorChangeset::new().is_empty());
        assert!(!MirrorChangeset::new().download_udebs(false).is_empty());
    }

    #[test]
    fn test_explicit_false_is_a_change() {
        let changes = MirrorChangeset::new().filter_with_deps(false);
        assert_eq!(changes.filter_with_deps, Some(false));
        assert!(changes.filter.is_none());
    }

    #[test]
    fn test_empty_reference_list_is_a_change() {
        let changes = MirrorChangeset::new().repo_references("");
        assert_eq!(changes.repo_references.as_deref(), Some(""));
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_requires_refetch() {
        assert!(!MirrorChangeset::new().filter("nginx").requires_refetch());
        assert!(MirrorChangeset::new().architectures(["amd64"]).requires_refetch());
    }

    #[test]
    fn test_parse_architecture_list() {
        assert_eq!(
            parse_architecture_list("amd64, arm64,,i386 "),
            vec!["amd64", "arm64", "i386"]
        );
        assert!(parse_architecture_list("").is_empty());
    }
}
