use crate::keys::KeyScheme;
use serde::Deserialize;

/// Main configuration structure for pagemap
///
/// Every section and field is optional in the file; missing values fall
/// back to the defaults below, and a missing file means a fully default
/// configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Default seed URL; the CLI argument overrides it
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Maximum link depth from the seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of pages per run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Whether to download page assets
    #[serde(rename = "include-resources", default)]
    pub include_resources: bool,

    /// Regex patterns; matching URLs are never crawled
    #[serde(rename = "exclude-patterns", default)]
    pub exclude_patterns: Vec<String>,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory the filesystem sink writes under
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: String,

    /// Page key scheme: "hash" or "hierarchical"
    #[serde(rename = "key-scheme", default)]
    pub key_scheme: KeyScheme,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_pages() -> usize {
    500
}

fn default_output_dir() -> String {
    "./pagemap-output".to_string()
}

fn default_user_agent() -> String {
    concat!("pagemap/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            include_resources: false,
            exclude_patterns: Vec::new(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            key_scheme: KeyScheme::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}
