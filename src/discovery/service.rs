//! Discovery orchestration
//!
//! Tries the cheap path (sitemaps) before the expensive one (a bounded
//! crawl), then hands the URL list to the structure analyzer.

use crate::crawler::{CrawlRequest, Frontier};
use crate::discovery::sitemap::SitemapResolver;
use crate::discovery::structure::{analyze_structure, SiteStructure};
use crate::fetch::Fetcher;
use crate::render::PageRenderer;
use crate::url::normalize_url;
use crate::Result;

/// Depth bound for the fallback discovery crawl
const FALLBACK_MAX_DEPTH: u32 = 3;

/// Page bound for the fallback discovery crawl
const FALLBACK_MAX_PAGES: usize = 200;

/// Maps a site's URL space without crawling page content first
pub struct DiscoveryService<'a> {
    renderer: &'a dyn PageRenderer,
    fetcher: &'a dyn Fetcher,
}

impl<'a> DiscoveryService<'a> {
    pub fn new(renderer: &'a dyn PageRenderer, fetcher: &'a dyn Fetcher) -> Self {
        Self { renderer, fetcher }
    }

    /// Discovers a site's URLs and aggregates them into a [`SiteStructure`]
    ///
    /// Sitemap resolution runs first; when the site exposes no usable
    /// sitemap, a bounded crawl (depth 3, 200 pages) maps the site instead.
    ///
    /// # Errors
    ///
    /// Fails on an unusable seed URL, or when the fallback crawl itself
    /// cannot be seeded.
    pub async fn discover(&self, seed: &str) -> Result<SiteStructure> {
        let seed_url = normalize_url(seed)?;

        let resolver = SitemapResolver::new(self.fetcher);
        let mut urls = resolver.discover_urls(&seed_url).await;

        if urls.is_empty() {
            tracing::info!("Falling back to bounded crawl for {}", seed_url);
            let request = CrawlRequest::new(seed, FALLBACK_MAX_DEPTH, FALLBACK_MAX_PAGES);
            let frontier = Frontier::new(request, self.renderer, self.fetcher)?;
            urls = frontier
                .run()
                .await?
                .into_iter()
                .map(|page| page.url)
                .collect();
        }

        Ok(analyze_structure(&urls))
    }
}
