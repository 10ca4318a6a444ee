//! Sitemap-based URL discovery
//!
//! Resolution order: robots.txt `sitemap:` lines first, then common probe
//! paths. Sitemap indexes are resolved recursively with a visited set and a
//! depth cap so cyclic or malformed indexes always terminate.

use crate::fetch::Fetcher;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use url::Url;

/// Recursion cap for nested sitemap indexes
const MAX_SITEMAP_DEPTH: u8 = 5;

/// Probe paths tried, in order, when robots.txt yields nothing
const COMMON_SITEMAP_PATHS: &[&str] = &["/sitemap.xml", "/sitemap_index.xml", "/wp-sitemap.xml"];

/// The `<loc>` values of one sitemap document, split by role
#[derive(Debug, Default)]
struct SitemapContents {
    /// Child sitemap locations (`<sitemapindex>` entries)
    sitemaps: Vec<String>,

    /// Page locations (`<urlset>` entries)
    urls: Vec<String>,
}

/// Resolves a site's sitemaps into a flat page URL list
pub struct SitemapResolver<'a> {
    fetcher: &'a dyn Fetcher,
}

impl<'a> SitemapResolver<'a> {
    pub fn new(fetcher: &'a dyn Fetcher) -> Self {
        Self { fetcher }
    }

    /// Discovers page URLs for a site
    ///
    /// Reads robots.txt at the origin (a non-200 response is treated as
    /// absent), resolves every advertised sitemap, and falls back to the
    /// common probe paths when that yields nothing. Returns an empty list
    /// when the site exposes no usable sitemap; the caller decides how to
    /// proceed.
    pub async fn discover_urls(&self, origin: &Url) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut urls: Vec<String> = Vec::new();

        if let Ok(robots_url) = origin.join("/robots.txt") {
            match self.fetcher.fetch(robots_url.as_str()).await {
                Ok(res) if res.is_success() => {
                    let body = String::from_utf8_lossy(&res.bytes).into_owned();
                    let advertised = extract_sitemap_urls(&body);
                    tracing::debug!(
                        "robots.txt advertises {} sitemap(s)",
                        advertised.len()
                    );
                    for sitemap_url in advertised {
                        let found = self.resolve(sitemap_url, 0, &mut seen).await;
                        urls.extend(found);
                    }
                }
                Ok(res) => {
                    tracing::debug!("No robots.txt at {} (HTTP {})", robots_url, res.status);
                }
                Err(e) => {
                    tracing::debug!("Failed to fetch robots.txt at {}: {}", robots_url, e);
                }
            }
        }

        if !urls.is_empty() {
            tracing::info!("Sitemap discovery found {} URLs via robots.txt", urls.len());
            return urls;
        }

        for path in COMMON_SITEMAP_PATHS {
            let Ok(probe) = origin.join(path) else {
                continue;
            };
            let found = self.resolve(probe.to_string(), 0, &mut seen).await;
            if !found.is_empty() {
                tracing::info!("Sitemap discovery found {} URLs via {}", found.len(), path);
                return found;
            }
        }

        tracing::info!("No usable sitemap found for {}", origin);
        Vec::new()
    }

    /// Resolves one sitemap URL, recursing into index children
    ///
    /// Each node failure (fetch error, non-200, bad XML) yields an empty
    /// list for that node only; siblings still resolve. Already-seen URLs
    /// and nodes past the depth cap are skipped.
    fn resolve<'b>(
        &'b self,
        url: String,
        depth: u8,
        seen: &'b mut HashSet<String>,
    ) -> Pin<Box<dyn Future<Output = Vec<String>> + Send + 'b>> {
        Box::pin(async move {
            if depth > MAX_SITEMAP_DEPTH {
                tracing::warn!("Sitemap nesting too deep at {}, stopping", url);
                return Vec::new();
            }

            if !seen.insert(url.clone()) {
                tracing::debug!("Sitemap {} already resolved, skipping", url);
                return Vec::new();
            }

            let fetched = match self.fetcher.fetch(&url).await {
                Ok(res) if res.is_success() => res,
                Ok(res) => {
                    tracing::debug!("Sitemap {} returned HTTP {}", url, res.status);
                    return Vec::new();
                }
                Err(e) => {
                    tracing::debug!("Failed to fetch sitemap {}: {}", url, e);
                    return Vec::new();
                }
            };

            let body = String::from_utf8_lossy(&fetched.bytes).into_owned();
            let contents = parse_sitemap(&body);

            let mut urls = contents.urls;
            for child in contents.sitemaps {
                let child_urls = self.resolve(child, depth + 1, seen).await;
                urls.extend(child_urls);
            }

            urls
        })
    }
}

/// Extracts `sitemap:` directive values from a robots.txt body
///
/// Matching is case-insensitive on the directive name; values are taken
/// verbatim after the first colon.
fn extract_sitemap_urls(robots: &str) -> Vec<String> {
    robots
        .lines()
        .filter_map(|line| {
            let (key, value) = line.trim().split_once(':')?;
            if !key.trim().eq_ignore_ascii_case("sitemap") {
                return None;
            }
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

/// Parses sitemap XML, collecting `<loc>` values by parent element
///
/// A `<loc>` inside `<sitemap>` is a child sitemap; any other `<loc>` is a
/// page URL. Element names are matched by local name, so namespace-prefixed
/// documents parse the same. Malformed XML yields whatever was collected
/// before the error.
fn parse_sitemap(xml: &str) -> SitemapContents {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut contents = SitemapContents::default();
    let mut in_sitemap_entry = false;
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap_entry = true,
                b"url" => in_sitemap_entry = false,
                b"loc" => in_loc = true,
                _ => {}
            },
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(loc) = t.unescape() {
                    let loc = loc.trim().to_string();
                    if !loc.is_empty() {
                        if in_sitemap_entry {
                            contents.sitemaps.push(loc);
                        } else {
                            contents.urls.push(loc);
                        }
                    }
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap_entry = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Sitemap XML error: {}", e);
                break;
            }
            _ => {}
        }
    }

    contents
}
