//! Site structure analysis
//!
//! Aggregates a discovered URL list into a per-section histogram and
//! persists the result as the crawl manifest.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Aggregated view of a site's discovered URLs
///
/// Serialized as the crawl manifest: `{ totalUrls, urls, sections }`.
/// Section keys are top-level path prefixes (`/blog/`, `/docs/`); URLs with
/// no path segment fall under `/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteStructure {
    /// Number of discovered URLs, including unparseable ones
    pub total_urls: usize,

    /// The discovered URLs, in discovery order
    pub urls: Vec<String>,

    /// URL count per top-level section
    pub sections: BTreeMap<String, usize>,
}

impl SiteStructure {
    /// Writes the manifest as pretty-printed JSON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Manifest(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a manifest from disk
    ///
    /// # Errors
    ///
    /// A missing or unparseable manifest is a configuration error; callers
    /// treat it as fatal rather than silently crawling without one.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Manifest(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::Manifest(format!("cannot parse {}: {}", path.display(), e)))
    }
}

/// Builds a [`SiteStructure`] from a discovered URL list
///
/// Unparseable URLs still count toward `total_urls` and appear in `urls`,
/// but contribute to no section.
pub fn analyze_structure(urls: &[String]) -> SiteStructure {
    let mut sections: BTreeMap<String, usize> = BTreeMap::new();

    for url_str in urls {
        let Ok(url) = Url::parse(url_str) else {
            continue;
        };
        *sections.entry(section_of(&url)).or_insert(0) += 1;
    }

    SiteStructure {
        total_urls: urls.len(),
        urls: urls.to_vec(),
        sections,
    }
}

/// The top-level section a URL belongs to
fn section_of(url: &Url) -> String {
    match url
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|first| !first.is_empty())
    {
        Some(first) => format!("/{}/", first),
        None => "/".to_string(),
    }
}
