//! Ingestion pipeline
//!
//! Runs a crawl and turns every page into an addressable JSON record in a
//! storage sink. Sink failures are per-object: one bad put never aborts
//! the run.

use crate::crawler::{CrawlRequest, Frontier, PageResult};
use crate::fetch::Fetcher;
use crate::keys::{page_key, resource_key, KeyScheme};
use crate::render::PageRenderer;
use crate::storage::StorageSink;
use crate::{ConfigError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored resource reference inside a page record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// URL the resource was fetched from
    pub url: String,

    /// Storage key the resource bytes live under
    pub key: String,

    /// Resource kind ("image", "pdf", "other")
    #[serde(rename = "type")]
    pub kind: String,
}

/// The JSON document stored per crawled page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Final page URL
    pub url: String,

    /// Page title
    pub title: String,

    /// Visible text content
    pub content: String,

    /// When the page was crawled
    pub crawled_at: DateTime<Utc>,

    /// Stored resources, omitted when none were stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<ResourceRecord>>,
}

/// Counts from one ingestion run
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestReport {
    /// Pages the crawl produced
    pub pages_crawled: usize,

    /// Page records stored successfully
    pub pages_stored: usize,

    /// Resource objects stored successfully
    pub resources_stored: usize,

    /// Sink puts that failed and were skipped
    pub put_failures: usize,
}

/// Crawls a site and stores one JSON record per page
pub struct IngestPipeline<'a> {
    renderer: &'a dyn PageRenderer,
    fetcher: &'a dyn Fetcher,
    sink: &'a dyn StorageSink,
    key_scheme: KeyScheme,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(
        renderer: &'a dyn PageRenderer,
        fetcher: &'a dyn Fetcher,
        sink: &'a dyn StorageSink,
        key_scheme: KeyScheme,
    ) -> Self {
        Self {
            renderer,
            fetcher,
            sink,
            key_scheme,
        }
    }

    /// Runs the crawl and stores its pages
    ///
    /// # Errors
    ///
    /// Fails when the request names neither a seed nor a manifest, or when
    /// the frontier cannot be seeded. Per-object sink failures are logged,
    /// counted in the report, and skipped.
    pub async fn run(&self, request: CrawlRequest) -> Result<IngestReport> {
        if request.seed_url.trim().is_empty() && !request.is_manifest_mode() {
            return Err(ConfigError::Validation(
                "either a seed URL or a page manifest is required".to_string(),
            )
            .into());
        }

        let frontier = Frontier::new(request, self.renderer, self.fetcher)?;
        let pages = frontier.run().await?;

        let mut report = IngestReport {
            pages_crawled: pages.len(),
            ..Default::default()
        };

        for page in pages {
            self.store_page(page, &mut report);
        }

        tracing::info!(
            "Ingest complete: {} pages stored, {} resources, {} failures",
            report.pages_stored,
            report.resources_stored,
            report.put_failures
        );

        Ok(report)
    }

    fn store_page(&self, page: PageResult, report: &mut IngestReport) {
        let key = page_key(&page.url, self.key_scheme);

        let mut resource_records = Vec::new();
        for resource in &page.resources {
            let rkey = resource_key(&key, &resource.source_url, &resource.extension);
            match self
                .sink
                .put(&rkey, &resource.bytes, "application/octet-stream")
            {
                Ok(()) => {
                    report.resources_stored += 1;
                    resource_records.push(ResourceRecord {
                        url: resource.source_url.clone(),
                        key: rkey,
                        kind: resource.kind.as_str().to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to store resource {}: {}", rkey, e);
                    report.put_failures += 1;
                }
            }
        }

        let record = PageRecord {
            url: page.url,
            title: page.title,
            content: page.text_content,
            crawled_at: Utc::now(),
            resources: (!resource_records.is_empty()).then_some(resource_records),
        };

        let json = match serde_json::to_vec_pretty(&record) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("Failed to serialize record for {}: {}", record.url, e);
                report.put_failures += 1;
                return;
            }
        };

        match self.sink.put(&key, &json, "application/json") {
            Ok(()) => report.pages_stored += 1,
            Err(e) => {
                tracing::warn!("Failed to store page {}: {}", key, e);
                report.put_failures += 1;
            }
        }
    }
}
