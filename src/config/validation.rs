use crate::config::parser::compile_exclude_patterns;
use crate::config::types::Config;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawl(config)?;
    validate_http(config)?;
    Ok(())
}

fn validate_crawl(config: &Config) -> ConfigResult<()> {
    if config.crawl.max_pages < 1 {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1".to_string(),
        ));
    }

    if let Some(seed) = &config.crawl.seed_url {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::Validation(format!("invalid seed-url '{}': {}", seed, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "seed-url must be http or https, got '{}'",
                seed
            )));
        }
    }

    // Fails on the first bad pattern with its name
    compile_exclude_patterns(&config.crawl.exclude_patterns)?;

    Ok(())
}

fn validate_http(config: &Config) -> ConfigResult<()> {
    if config.http.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}
