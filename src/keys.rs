//! Storage key derivation
//!
//! Maps page and resource URLs to the keys they are stored under. Keys are
//! always derived, never stored, so the same URL maps to the same key on
//! every run.

use crate::url::extract_domain;
use serde::{Deserialize, Serialize};
use url::Url;

/// How page URLs map to storage keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyScheme {
    /// `{domain}/{md5(url)}.json`: opaque but collision-free
    Hash,

    /// `{domain}{path}.json`: human-readable, mirrors the site layout
    #[default]
    Hierarchical,
}

/// Derives the storage key for a page URL under a scheme
pub fn page_key(url: &str, scheme: KeyScheme) -> String {
    match scheme {
        KeyScheme::Hash => hash_key(url),
        KeyScheme::Hierarchical => hierarchical_key(url),
    }
}

/// Hash-based page key: `{domain}/{md5(url)}.json`
pub fn hash_key(url: &str) -> String {
    format!("{}/{:x}.json", domain_of(url), md5::compute(url))
}

/// Hierarchical page key: `{domain}{path}.json`
///
/// One trailing slash is stripped and the bare root path becomes `/index`,
/// so `https://ex.com/a/b/` maps to `ex.com/a/b.json` and the site root to
/// `ex.com/index.json`. Query strings are ignored, so URLs differing only
/// in their query collide; callers wanting distinct keys per query use
/// [`KeyScheme::Hash`]. An unparseable URL falls back to the hash key.
pub fn hierarchical_key(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return hash_key(url);
    };
    let Some(domain) = extract_domain(&parsed) else {
        return hash_key(url);
    };

    let mut path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path == "/" {
        path = "/index".to_string();
    }

    format!("{}{}.json", domain, path)
}

/// Derives the key for a resource belonging to a page
///
/// Resources live next to their page: `{base}_resources/{md5(url)}.{ext}`,
/// where `base` is the page key without its `.json` suffix.
pub fn resource_key(page_key: &str, resource_url: &str, extension: &str) -> String {
    let base = page_key.strip_suffix(".json").unwrap_or(page_key);
    format!(
        "{}_resources/{:x}.{}",
        base,
        md5::compute(resource_url),
        extension
    )
}

fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| extract_domain(&u))
        .unwrap_or_else(|| "unknown".to_string())
}
