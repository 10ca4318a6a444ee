use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Loads a configuration file if given, defaults otherwise
///
/// A missing path means "no config file", not an error; the defaults are a
/// complete, usable configuration.
pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

/// Compiles exclude pattern strings into regexes
///
/// # Errors
///
/// A pattern that fails to compile is a configuration error; it names the
/// offending pattern.
pub fn compile_exclude_patterns(patterns: &[String]) -> ConfigResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", p, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyScheme;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
[crawl]
seed-url = "https://example.com"
max-depth = 5
max-pages = 50
include-resources = true
exclude-patterns = ["/admin/"]

[storage]
output-dir = "/tmp/out"
key-scheme = "hash"

[http]
user-agent = "custom-agent/2.0"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawl.seed_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.crawl.max_depth, 5);
        assert_eq!(config.crawl.max_pages, 50);
        assert!(config.crawl.include_resources);
        assert_eq!(config.crawl.exclude_patterns, vec!["/admin/"]);
        assert_eq!(config.storage.output_dir, "/tmp/out");
        assert_eq!(config.storage.key_scheme, KeyScheme::Hash);
        assert_eq!(config.http.user_agent, "custom-agent/2.0");
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawl.max_depth, 3);
        assert_eq!(config.crawl.max_pages, 500);
        assert!(!config.crawl.include_resources);
        assert_eq!(config.storage.key_scheme, KeyScheme::Hierarchical);
        assert!(config.http.user_agent.starts_with("pagemap/"));
    }

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_or_default(None).unwrap();
        assert_eq!(config.crawl.max_pages, 500);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let file = write_config("[crawl\nmax-depth = ");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_bad_seed_url_fails_validation() {
        let file = write_config("[crawl]\nseed-url = \"not a url\"\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_bad_pattern_fails_validation() {
        let file = write_config("[crawl]\nexclude-patterns = [\"(unclosed\"]\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_compile_exclude_patterns() {
        let compiled =
            compile_exclude_patterns(&["/admin/".to_string(), r"\?page=".to_string()]).unwrap();
        assert_eq!(compiled.len(), 2);
        assert!(compiled[0].is_match("https://ex.com/admin/x"));

        assert!(compile_exclude_patterns(&["(unclosed".to_string()]).is_err());
    }
}
