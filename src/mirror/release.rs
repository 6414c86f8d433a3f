// src/mirror/release.rs

//! Debian `Release` file metadata
//!
//! The refresh step keeps the parsed top-level stanza so later package
//! operations know which architectures and components the archive offers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PGP_SIGNED_HEADER: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
const PGP_SIGNATURE_HEADER: &str = "-----BEGIN PGP SIGNATURE-----";

/// Index metadata captured by a successful refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseIndex {
    /// Raw stanza fields (`Origin`, `Suite`, `Codename`, `SHA256`, ...)
    pub fields: BTreeMap<String, String>,
    /// Architectures advertised by the archive
    pub architectures: Vec<String>,
    /// Components advertised by the archive
    pub components: Vec<String>,
    /// RFC 3339 time of the fetch
    pub fetched_at: String,
}

impl ReleaseIndex {
    /// Parse a `Release` or clear-signed `InRelease` document
    pub fn parse(content: &str) -> Result<Self> {
        let body = strip_clearsign(content);
        let stanzas: Vec<BTreeMap<String, String>> = rfc822_like::from_str(&body)
            .map_err(|e| Error::Fetch(format!("malformed Release file: {e}")))?;

        // Release files carry a single stanza
        let fields = stanzas
            .into_iter()
            .next()
            .filter(|fields| !fields.is_empty())
            .ok_or_else(|| Error::Fetch("Release file is empty".to_string()))?;

        let split = |name: &str| -> Vec<String> {
            fields
                .get(name)
                .map(|v| v.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default()
        };
        let architectures = split("Architectures");
        let components = split("Components");

        Ok(Self {
            fields,
            architectures,
            components,
            fetched_at: String::new(),
        })
    }

    /// Whether the archive offers `component`, accepting `updates/main` for `main`
    pub fn has_component(&self, component: &str) -> bool {
        self.components.iter().any(|c| {
            c == component || c.rsplit_once('/').is_some_and(|(_, tail)| tail == component)
        })
    }

    pub fn has_architecture(&self, arch: &str) -> bool {
        self.architectures.iter().any(|a| a == arch)
    }
}

/// Drop the OpenPGP clear-signature framing, undoing dash-escaping
fn strip_clearsign(content: &str) -> String {
    let mut lines = content.lines();
    if !content.trim_start().starts_with(PGP_SIGNED_HEADER) {
        return content.to_string();
    }

    // Armor header lines (`Hash: SHA256`) end at the first blank line
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
    }

    let mut body = String::new();
    for line in lines {
        if line.starts_with(PGP_SIGNATURE_HEADER) {
            break;
        }
        body.push_str(line.strip_prefix("- ").unwrap_or(line));
        body.push('\n');
    }
    body
}
