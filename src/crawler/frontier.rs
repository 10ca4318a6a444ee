//! Breadth-first crawl frontier
//!
//! One-shot engine: seed it, run it, take the results. The visited set is
//! the sole dedup authority; a URL is marked visited when it is enqueued,
//! never when it is processed, so a URL can only ever be enqueued once.

use crate::crawler::resources::{collect_resources, PageResource};
use crate::fetch::Fetcher;
use crate::render::PageRenderer;
use crate::url::{is_crawlable, normalize_url};
use crate::Result;
use regex::Regex;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Parameters for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Starting URL; ignored when `include_urls` is non-empty
    pub seed_url: String,

    /// Maximum link depth from the seed (seed is depth 0)
    pub max_depth: u32,

    /// Maximum number of pages to process
    pub max_pages: usize,

    /// Compiled patterns; matching URLs are never enqueued
    pub exclude_patterns: Vec<Regex>,

    /// Explicit page list; non-empty puts the frontier in manifest mode
    pub include_urls: Vec<String>,

    /// Whether to download page assets (images, documents)
    pub include_resources: bool,
}

impl CrawlRequest {
    /// A request crawling from a single seed with the given bounds
    pub fn new(seed_url: impl Into<String>, max_depth: u32, max_pages: usize) -> Self {
        Self {
            seed_url: seed_url.into(),
            max_depth,
            max_pages,
            exclude_patterns: Vec::new(),
            include_urls: Vec::new(),
            include_resources: false,
        }
    }

    /// True when an explicit page list replaces link discovery
    pub fn is_manifest_mode(&self) -> bool {
        !self.include_urls.is_empty()
    }
}

/// A URL waiting in the crawl queue
#[derive(Debug, Clone)]
struct QueueEntry {
    url: Url,
    depth: u32,
}

/// One successfully processed page
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Final URL after redirects
    pub url: String,

    /// Page title (empty if none)
    pub title: String,

    /// Visible text content
    pub text_content: String,

    /// Absolute hrefs extracted from the page, in document order
    pub outgoing_links: Vec<String>,

    /// Downloaded assets, empty unless resource download was requested
    pub resources: Vec<PageResource>,
}

/// Breadth-first crawl engine
///
/// Owns the queue, visited set, and accumulated results for a single run.
/// Page-level failures (render errors, non-HTML responses) are logged and
/// skipped without counting toward the page limit.
pub struct Frontier<'a> {
    request: CrawlRequest,
    renderer: &'a dyn PageRenderer,
    fetcher: &'a dyn Fetcher,
    queue: VecDeque<QueueEntry>,
    visited: HashSet<String>,
    origin: Url,
    crawl_prefix: String,
}

impl<'a> Frontier<'a> {
    /// Seeds a frontier from a crawl request
    ///
    /// In manifest mode every parseable manifest URL is enqueued at depth 0
    /// and pre-marked visited, and the page limit becomes the manifest
    /// length. Otherwise the single seed is enqueued at depth 0. Link
    /// containment is anchored at the seed URL: only links whose normalized
    /// form starts with the seed are followed, so a seed of
    /// `https://example.com/docs` keeps the crawl inside `/docs`.
    ///
    /// # Errors
    ///
    /// Fails if the seed URL (or, in manifest mode, every manifest URL)
    /// cannot be normalized.
    pub fn new(
        request: CrawlRequest,
        renderer: &'a dyn PageRenderer,
        fetcher: &'a dyn Fetcher,
    ) -> Result<Self> {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut request = request;

        if request.is_manifest_mode() {
            for raw in &request.include_urls {
                match normalize_url(raw) {
                    Ok(url) => {
                        if visited.insert(url.to_string()) {
                            queue.push_back(QueueEntry { url, depth: 0 });
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Skipping unparseable manifest URL {}: {}", raw, e);
                    }
                }
            }
            request.max_pages = request.include_urls.len();
        }

        // Manifest mode never enqueues links, so the origin anchor can fall
        // back to the first manifest entry when no usable seed was given.
        let seed = match normalize_url(&request.seed_url) {
            Ok(seed) => seed,
            Err(e) => match queue.front() {
                Some(entry) if request.is_manifest_mode() => entry.url.clone(),
                _ => return Err(e.into()),
            },
        };

        if !request.is_manifest_mode() {
            visited.insert(seed.to_string());
            queue.push_back(QueueEntry {
                url: seed.clone(),
                depth: 0,
            });
        }

        let crawl_prefix = seed.to_string();

        Ok(Self {
            request,
            renderer,
            fetcher,
            queue,
            visited,
            origin: seed,
            crawl_prefix,
        })
    }

    /// Drains the queue breadth-first and returns the processed pages
    ///
    /// Terminates when the queue is empty or the page limit is reached.
    pub async fn run(mut self) -> Result<Vec<PageResult>> {
        let mut results: Vec<PageResult> = Vec::new();

        tracing::info!(
            "Starting crawl: seed={}, max_depth={}, max_pages={}, manifest={}",
            self.request.seed_url,
            self.request.max_depth,
            self.request.max_pages,
            self.request.is_manifest_mode()
        );

        while let Some(entry) = self.queue.pop_front() {
            if results.len() >= self.request.max_pages {
                tracing::info!("Page limit reached ({})", self.request.max_pages);
                break;
            }

            if entry.depth > self.request.max_depth {
                continue;
            }

            tracing::debug!("Processing {} (depth {})", entry.url, entry.depth);

            let page = match self.renderer.render(entry.url.as_str()).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Failed to render {}: {}", entry.url, e);
                    continue;
                }
            };

            // The first page of a non-manifest crawl may redirect to another
            // origin (www subdomain, http to https). The whole crawl follows
            // the redirect target from then on.
            if results.is_empty() && !self.request.is_manifest_mode() {
                self.rebase_on_redirect(&page.final_url);
            }

            if !self.request.is_manifest_mode() && entry.depth < self.request.max_depth {
                self.enqueue_links(&page.link_hrefs(), entry.depth + 1);
            }

            let resources = if self.request.include_resources {
                collect_resources(&page, self.fetcher).await
            } else {
                Vec::new()
            };

            results.push(PageResult {
                outgoing_links: page.link_hrefs(),
                url: page.final_url,
                title: page.title,
                text_content: page.text_content,
                resources,
            });
        }

        tracing::info!("Crawl complete: {} pages", results.len());
        Ok(results)
    }

    /// Moves the origin and containment prefix to the redirect target
    fn rebase_on_redirect(&mut self, final_url: &str) {
        let Ok(final_parsed) = Url::parse(final_url) else {
            return;
        };

        if final_parsed.origin() != self.origin.origin() {
            tracing::info!(
                "Seed redirected from {} to {}, rebasing crawl",
                self.origin,
                final_parsed
            );

            let old_origin = self.origin.origin().ascii_serialization();
            let new_origin = final_parsed.origin().ascii_serialization();
            if let Some(suffix) = self.crawl_prefix.strip_prefix(&old_origin) {
                self.crawl_prefix = format!("{}{}", new_origin, suffix);
            } else {
                self.crawl_prefix = new_origin;
            }
            self.origin = final_parsed;
        }
    }

    /// Filters, dedups, and enqueues the links of a processed page
    fn enqueue_links(&mut self, links: &[String], depth: u32) {
        for link in links {
            let Ok(normalized) = normalize_url(link) else {
                continue;
            };
            let normalized_str = normalized.to_string();

            if !is_crawlable(&normalized_str, &self.origin, &self.request.exclude_patterns) {
                continue;
            }

            if !normalized_str.starts_with(&self.crawl_prefix) {
                continue;
            }

            if self.visited.insert(normalized_str) {
                self.queue.push_back(QueueEntry {
                    url: normalized,
                    depth,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedResource;
    use crate::render::{Anchor, PageRenderer, RenderedPage};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages keyed by URL; anything else is a 404 render error
    struct StubRenderer {
        pages: HashMap<String, RenderedPage>,
        rendered: Mutex<Vec<String>>,
    }

    impl StubRenderer {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                rendered: Mutex::new(Vec::new()),
            }
        }

        fn add_page(&mut self, url: &str, links: &[&str]) {
            self.add_redirected_page(url, url, links);
        }

        fn add_redirected_page(&mut self, url: &str, final_url: &str, links: &[&str]) {
            self.pages.insert(
                url.to_string(),
                RenderedPage {
                    final_url: final_url.to_string(),
                    status: 200,
                    title: format!("Title of {}", url),
                    text_content: "text".to_string(),
                    anchors: links
                        .iter()
                        .map(|l| Anchor {
                            href: l.to_string(),
                            text: String::new(),
                        })
                        .collect(),
                    images: vec![],
                },
            );
        }

        fn rendered_urls(&self) -> Vec<String> {
            self.rendered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageRenderer for StubRenderer {
        async fn render(&self, url: &str) -> Result<RenderedPage> {
            self.rendered.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| crate::PagemapError::Render {
                    url: url.to_string(),
                    message: "HTTP 404".to_string(),
                })
        }
    }

    struct NoopFetcher;

    #[async_trait]
    impl Fetcher for NoopFetcher {
        async fn fetch(&self, _url: &str) -> Result<FetchedResource> {
            Ok(FetchedResource {
                status: 404,
                content_type: String::new(),
                bytes: vec![],
            })
        }
    }

    async fn run_crawl(request: CrawlRequest, renderer: &StubRenderer) -> Vec<PageResult> {
        let fetcher = NoopFetcher;
        let frontier = Frontier::new(request, renderer, &fetcher).unwrap();
        frontier.run().await.unwrap()
    }

    #[tokio::test]
    async fn test_single_page_crawl() {
        let mut renderer = StubRenderer::new();
        renderer.add_page("https://example.com/", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 3, 10), &renderer).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/");
        assert_eq!(results[0].title, "Title of https://example.com/");
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &["https://example.com/a", "https://example.com/b"],
        );
        renderer.add_page("https://example.com/a", &["https://example.com/a/deep"]);
        renderer.add_page("https://example.com/b", &[]);
        renderer.add_page("https://example.com/a/deep", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 5, 10), &renderer).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/a",
                "https://example.com/b",
                "https://example.com/a/deep"
            ]
        );
    }

    #[tokio::test]
    async fn test_max_pages_bound() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &[
                "https://example.com/1",
                "https://example.com/2",
                "https://example.com/3",
                "https://example.com/4",
            ],
        );
        for i in 1..=4 {
            renderer.add_page(&format!("https://example.com/{}", i), &[]);
        }

        let results = run_crawl(CrawlRequest::new("https://example.com", 3, 3), &renderer).await;
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_max_depth_bound() {
        let mut renderer = StubRenderer::new();
        renderer.add_page("https://example.com/", &["https://example.com/d1"]);
        renderer.add_page("https://example.com/d1", &["https://example.com/d2"]);
        renderer.add_page("https://example.com/d2", &["https://example.com/d3"]);
        renderer.add_page("https://example.com/d3", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 1, 10), &renderer).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/", "https://example.com/d1"]);
    }

    #[tokio::test]
    async fn test_no_double_enqueue() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &["https://example.com/a", "https://example.com/a"],
        );
        renderer.add_page("https://example.com/a", &["https://example.com/"]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 5, 10), &renderer).await;
        assert_eq!(results.len(), 2);
        assert_eq!(renderer.rendered_urls().len(), 2);
    }

    #[tokio::test]
    async fn test_fragment_variants_collapse() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &[
                "https://example.com/page#top",
                "https://example.com/page#bottom",
            ],
        );
        renderer.add_page("https://example.com/page", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 3, 10), &renderer).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_cross_origin_never_enqueued() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &["https://other.com/x", "https://example.com/in"],
        );
        renderer.add_page("https://example.com/in", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 3, 10), &renderer).await;
        assert_eq!(results.len(), 2);
        assert!(!renderer
            .rendered_urls()
            .iter()
            .any(|u| u.contains("other.com")));
    }

    #[tokio::test]
    async fn test_render_failure_skipped_without_counting() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &["https://example.com/broken", "https://example.com/ok"],
        );
        renderer.add_page("https://example.com/ok", &[]);

        let results = run_crawl(CrawlRequest::new("https://example.com", 3, 2), &renderer).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/", "https://example.com/ok"]);
    }

    #[tokio::test]
    async fn test_manifest_mode_crawls_exactly_the_list() {
        let mut renderer = StubRenderer::new();
        renderer.add_page("https://example.com/a", &["https://example.com/never"]);
        renderer.add_page("https://example.com/b", &[]);
        renderer.add_page("https://example.com/never", &[]);

        let mut request = CrawlRequest::new("https://example.com", 3, 500);
        request.include_urls = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ];

        let results = run_crawl(request, &renderer).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[tokio::test]
    async fn test_manifest_mode_overrides_page_limit() {
        let mut renderer = StubRenderer::new();
        renderer.add_page("https://example.com/a", &[]);
        renderer.add_page("https://example.com/b", &[]);

        // A limit below the manifest length must not truncate the manifest
        let mut request = CrawlRequest::new("https://example.com", 3, 1);
        request.include_urls = vec![
            "https://example.com/a".to_string(),
            "https://example.com/b".to_string(),
        ];

        let results = run_crawl(request, &renderer).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_manifest_mode_skips_bad_urls() {
        let mut renderer = StubRenderer::new();
        renderer.add_page("https://example.com/a", &[]);

        let mut request = CrawlRequest::new("https://example.com", 3, 500);
        request.include_urls = vec![
            "not a url at all".to_string(),
            "https://example.com/a".to_string(),
        ];

        let results = run_crawl(request, &renderer).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_redirect_rebases_origin() {
        let mut renderer = StubRenderer::new();
        renderer.add_redirected_page(
            "http://example.com/",
            "https://www.example.com/",
            &["https://www.example.com/about"],
        );
        renderer.add_page("https://www.example.com/about", &[]);

        let results = run_crawl(CrawlRequest::new("http://example.com", 3, 10), &renderer).await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://www.example.com/", "https://www.example.com/about"]
        );
    }

    #[tokio::test]
    async fn test_seed_prefix_containment() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/docs",
            &["https://example.com/docs/guide", "https://example.com/blog"],
        );
        renderer.add_page("https://example.com/docs/guide", &[]);
        renderer.add_page("https://example.com/blog", &[]);

        let results = run_crawl(
            CrawlRequest::new("https://example.com/docs", 3, 10),
            &renderer,
        )
        .await;
        let urls: Vec<&str> = results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/docs",
                "https://example.com/docs/guide"
            ]
        );
    }

    #[tokio::test]
    async fn test_exclude_patterns() {
        let mut renderer = StubRenderer::new();
        renderer.add_page(
            "https://example.com/",
            &["https://example.com/admin/panel", "https://example.com/ok"],
        );
        renderer.add_page("https://example.com/ok", &[]);

        let mut request = CrawlRequest::new("https://example.com", 3, 10);
        request.exclude_patterns = vec![Regex::new(r"/admin/").unwrap()];

        let results = run_crawl(request, &renderer).await;
        assert_eq!(results.len(), 2);
        assert!(!results.iter().any(|r| r.url.contains("admin")));
    }

    #[tokio::test]
    async fn test_invalid_seed_is_an_error() {
        let renderer = StubRenderer::new();
        let fetcher = NoopFetcher;
        let request = CrawlRequest::new("ftp://example.com/files", 3, 10);
        assert!(Frontier::new(request, &renderer, &fetcher).is_err());
    }
}
