//! Pagemap: a site content mapper
//!
//! This crate discovers the pages of a website, crawls them breadth-first,
//! and turns every page into a normalized, addressable content record for
//! downstream ingestion (search indexing, RAG pipelines, archives).

pub mod config;
pub mod crawler;
pub mod discovery;
pub mod fetch;
pub mod ingest;
pub mod keys;
pub mod render;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for pagemap operations
#[derive(Debug, Error)]
pub enum PagemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Fetch error for {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only fatal errors in the crate; everything else is caught
/// at per-item scope, logged, and skipped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for pagemap operations
pub type Result<T> = std::result::Result<T, PagemapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlRequest, Frontier, PageResult};
pub use discovery::{DiscoveryService, SiteStructure};
pub use keys::KeyScheme;
pub use url::{extract_domain, is_crawlable, normalize_url};
