// src/mirror/fetch.rs

//! Index refresh against a mirror's remote archive
//!
//! A refresh downloads the archive's `Release` file and checks that it offers
//! everything the mirror asks for. Package lists are not downloaded here.

use super::release::ReleaseIndex;
use crate::config::FetchConfig;
use crate::db::models::RemoteMirror;
use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Pseudo-architecture for source packages; never listed in `Architectures:`
pub const SOURCE_ARCH: &str = "source";

/// Refreshes a mirror's index metadata
pub trait IndexFetcher {
    /// Fetch index metadata for `mirror`, restricted to `architectures`
    ///
    /// An empty `architectures` slice means "whatever the archive offers".
    fn refresh(&self, mirror: &RemoteMirror, architectures: &[String]) -> Result<ReleaseIndex>;
}

/// Location of the `Release` file for a mirror
pub fn release_url(mirror: &RemoteMirror) -> Result<Url> {
    let mut root = mirror.archive_root.clone();
    if !root.ends_with('/') {
        root.push('/');
    }
    let base = Url::parse(&root)
        .map_err(|e| Error::Fetch(format!("invalid archive URL {}: {e}", mirror.archive_root)))?;

    let relative = if mirror.is_flat() {
        format!("{}Release", mirror.distribution)
    } else {
        format!("dists/{}/Release", mirror.distribution)
    };

    base.join(&relative)
        .map_err(|e| Error::Fetch(format!("cannot build Release URL from {root}: {e}")))
}

/// Check a downloaded index against what the mirror needs
pub fn verify_release(
    mirror: &RemoteMirror,
    architectures: &[String],
    index: &ReleaseIndex,
) -> Result<()> {
    // Flat repositories don't advertise architectures or components
    if mirror.is_flat() {
        return Ok(());
    }

    for arch in architectures {
        if arch == SOURCE_ARCH {
            continue;
        }
        if !index.has_architecture(arch) {
            return Err(Error::Fetch(format!(
                "architecture {arch} not available in repo {mirror}"
            )));
        }
    }

    for component in &mirror.components {
        if !index.has_component(component) {
            return Err(Error::Fetch(format!(
                "component {component} not available in repo {mirror}"
            )));
        }
    }

    Ok(())
}

/// Production fetcher speaking HTTP(S)
pub struct HttpIndexFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpIndexFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("mirrorctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Fetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
        })
    }

    fn download(&self, url: &Url) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = self
                .client
                .get(url.clone())
                .send()
                .and_then(|response| response.error_for_status())
                .and_then(|response| response.text());

            match result {
                Ok(body) => return Ok(body),
                // 4xx won't get better on retry
                Err(e) if e.status().is_some_and(|s| s.is_client_error()) => {
                    return Err(Error::Fetch(format!("error downloading {url}: {e}")));
                }
                Err(e) if attempt >= self.max_retries => {
                    return Err(Error::Fetch(format!(
                        "error downloading {url} after {attempt} attempts: {e}"
                    )));
                }
                Err(e) => {
                    warn!(
                        "Download of {} failed (attempt {}/{}): {}",
                        url, attempt, self.max_retries, e
                    );
                    std::thread::sleep(self.retry_delay);
                }
            }
        }
    }
}

impl IndexFetcher for HttpIndexFetcher {
    fn refresh(&self, mirror: &RemoteMirror, architectures: &[String]) -> Result<ReleaseIndex> {
        let url = release_url(mirror)?;
        info!("Downloading {}...", url);

        let body = self.download(&url)?;
        let mut index = ReleaseIndex::parse(&body)?;
        verify_release(mirror, architectures, &index)?;
        index.fetched_at = chrono::Utc::now().to_rfc3339();

        debug!(
            "Release for {} offers architectures [{}] and components [{}]",
            mirror.name,
            index.architectures.join(", "),
            index.components.join(", ")
        );
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mirror(root: &str, distribution: &str) -> RemoteMirror {
        let mut mirror = RemoteMirror::new(
            "test".to_string(),
            root.to_string(),
            distribution.to_string(),
        );
        mirror.components = vec!["main".to_string()];
        mirror
    }

    fn index() -> ReleaseIndex {
        ReleaseIndex::parse("Architectures: amd64 arm64\nComponents: main contrib\n").unwrap()
    }

    #[test]
    fn test_release_url_dists_layout() {
        let url = release_url(&mirror("http://deb.debian.org/debian", "bookworm")).unwrap();
        assert_eq!(url.as_str(), "http://deb.debian.org/debian/dists/bookworm/Release");
    }

    #[test]
    fn test_release_url_flat_layout() {
        let url = release_url(&mirror("http://example.com/repo/", "./")).unwrap();
        assert_eq!(url.as_str(), "http://example.com/repo/Release");

        let url = release_url(&mirror("http://example.com/repo/", "stable/")).unwrap();
        assert_eq!(url.as_str(), "http://example.com/repo/stable/Release");
    }

    #[test]
    fn test_release_url_rejects_garbage() {
        assert!(matches!(
            release_url(&mirror("not a url", "bookworm")),
            Err(Error::Fetch(_))
        ));
    }

    #[test]
    fn test_verify_accepts_available_architectures() {
        let m = mirror("http://deb.debian.org/debian/", "bookworm");
        let archs = vec!["amd64".to_string(), SOURCE_ARCH.to_string()];
        verify_release(&m, &archs, &index()).unwrap();
    }

    #[test]
    fn test_verify_rejects_missing_architecture() {
        let m = mirror("http://deb.debian.org/debian/", "bookworm");
        let err = verify_release(&m, &["s390x".to_string()], &index()).unwrap_err();
        assert!(err.to_string().contains("architecture s390x not available"));
    }

    #[test]
    fn test_verify_rejects_missing_component() {
        let mut m = mirror("http://deb.debian.org/debian/", "bookworm");
        m.components.push("non-free".to_string());
        let err = verify_release(&m, &[], &index()).unwrap_err();
        assert!(err.to_string().contains("component non-free not available"));
    }

    #[test]
    fn test_verify_skips_flat_mirrors() {
        let m = mirror("http://example.com/repo/", "./");
        verify_release(&m, &["s390x".to_string()], &ReleaseIndex::default()).unwrap();
    }
}
