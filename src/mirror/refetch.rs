// src/mirror/refetch.rs

//! Conditional index refresh for architecture changes

use super::changeset::MirrorChangeset;
use super::fetch::IndexFetcher;
use crate::db::models::RemoteMirror;
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Trim tokens and drop repeats, keeping the first occurrence
pub fn normalize_architectures(archs: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(archs.len());
    for arch in archs.iter().map(|a| a.trim()).filter(|a| !a.is_empty()) {
        if !normalized.iter().any(|seen| seen == arch) {
            normalized.push(arch.to_string());
        }
    }
    normalized
}

/// Refresh the candidate's index when the changeset carries new architectures
///
/// Returns whether a refresh ran. Without an architecture change the
/// candidate's architectures and index metadata are left as they were.
pub fn refetch_if_requested(
    fetcher: &dyn IndexFetcher,
    candidate: &mut RemoteMirror,
    changes: &MirrorChangeset,
) -> Result<bool> {
    let Some(requested) = &changes.architectures else {
        debug!("No architecture change for {}, skipping refresh", candidate.name);
        return Ok(false);
    };

    let architectures = normalize_architectures(requested);
    if architectures.is_empty() {
        return Err(Error::InvariantViolation(
            "architecture list can't be empty".to_string(),
        ));
    }

    info!(
        "Refreshing index of {} for architectures [{}]",
        candidate.name,
        architectures.join(", ")
    );
    let index = fetcher.refresh(candidate, &architectures)?;

    candidate.last_fetch = Some(index.fetched_at.clone());
    candidate.release = Some(index);
    candidate.architectures = architectures;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::ReleaseIndex;
    use std::cell::RefCell;

    struct RecordingFetcher {
        calls: RefCell<Vec<Vec<String>>>,
        fail: bool,
    }

    impl RecordingFetcher {
        fn new(fail: bool) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl IndexFetcher for RecordingFetcher {
        fn refresh(&self, _mirror: &RemoteMirror, architectures: &[String]) -> Result<ReleaseIndex> {
            self.calls.borrow_mut().push(architectures.to_vec());
            if self.fail {
                return Err(Error::Fetch("connection refused".to_string()));
            }
            Ok(ReleaseIndex {
                architectures: architectures.to_vec(),
                fetched_at: "2026-10-17T00:00:00+00:00".to_string(),
                ..Default::default()
            })
        }
    }

    fn candidate() -> RemoteMirror {
        let mut mirror = RemoteMirror::new(
            "debian".to_string(),
            "http://deb.debian.org/debian/".to_string(),
            "bookworm".to_string(),
        );
        mirror.architectures = vec!["amd64".to_string()];
        mirror
    }

    #[test]
    fn test_normalize() {
        let raw = vec![
            " arm64".to_string(),
            "amd64".to_string(),
            "arm64".to_string(),
            "".to_string(),
        ];
        assert_eq!(normalize_architectures(&raw), vec!["arm64", "amd64"]);
    }

    #[test]
    fn test_skipped_without_architectures() {
        let fetcher = RecordingFetcher::new(false);
        let mut mirror = candidate();
        let before = mirror.clone();
        let changes = MirrorChangeset::new().filter("nginx");

        assert!(!refetch_if_requested(&fetcher, &mut mirror, &changes).unwrap());
        assert!(fetcher.calls.borrow().is_empty());
        assert_eq!(mirror, before);
    }

    #[test]
    fn test_refresh_updates_candidate() {
        let fetcher = RecordingFetcher::new(false);
        let mut mirror = candidate();
        let changes = MirrorChangeset::new().architectures(["arm64", "amd64", "arm64"]);

        assert!(refetch_if_requested(&fetcher, &mut mirror, &changes).unwrap());
        assert_eq!(*fetcher.calls.borrow(), vec![vec!["arm64".to_string(), "amd64".to_string()]]);
        assert_eq!(mirror.architectures, vec!["arm64", "amd64"]);
        assert_eq!(mirror.last_fetch.as_deref(), Some("2026-10-17T00:00:00+00:00"));
        assert!(mirror.release.is_some());
    }

    #[test]
    fn test_refresh_failure_propagates() {
        let fetcher = RecordingFetcher::new(true);
        let mut mirror = candidate();
        let changes = MirrorChangeset::new().architectures(["i386"]);

        let err = refetch_if_requested(&fetcher, &mut mirror, &changes).unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(mirror.architectures, vec!["amd64"]);
    }

    #[test]
    fn test_empty_architecture_list_rejected() {
        let fetcher = RecordingFetcher::new(false);
        let mut mirror = candidate();
        let changes = MirrorChangeset::new().architectures(Vec::<String>::new());

        let err = refetch_if_requested(&fetcher, &mut mirror, &changes).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
        assert!(fetcher.calls.borrow().is_empty());
    }
}
