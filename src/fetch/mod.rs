//! Bulk-fetch capability
//!
//! Raw byte retrieval for robots.txt, sitemap XML, and page assets. HTTP
//! failures are reported in-band through the status code; only transport
//! errors surface as `Err`, and callers treat both as a missing item.

use crate::{PagemapError, Result};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Raw bytes fetched from a URL, with transport metadata
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// HTTP status code of the final response
    pub status: u16,

    /// Content-Type header value (empty if absent)
    pub content_type: String,

    /// Response body
    pub bytes: Vec<u8>,
}

impl FetchedResource {
    /// True for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The bulk-fetch contract consumed by discovery and resource download
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and returns its bytes with transport metadata
    async fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

/// HTTP implementation of [`Fetcher`] backed by reqwest
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the crawl-wide timeouts
    ///
    /// # Arguments
    ///
    /// * `user_agent` - The User-Agent header value to send
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PagemapError::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PagemapError::Fetch {
                url: url.to_string(),
                source: e,
            })?
            .to_vec();

        Ok(FetchedResource {
            status,
            content_type,
            bytes,
        })
    }
}
