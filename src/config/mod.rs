//! Configuration module for pagemap
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. All fields have defaults, so running without a config file works.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, HttpConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compile_exclude_patterns, load_config, load_or_default};
