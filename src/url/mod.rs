//! URL handling for pagemap
//!
//! This module provides URL normalization, crawlability filtering, and
//! domain extraction.

mod normalize;

pub use normalize::normalize_url;

use regex::Regex;
use url::Url;

/// Path extensions that never point at crawlable documents
const SKIPPED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".bmp", ".ico", ".css", ".js", ".mjs",
    ".mp4", ".webm", ".mov", ".avi", ".pdf",
];

/// Decides whether a URL belongs in the crawl frontier
///
/// A URL is crawlable only if all of the following hold:
///
/// 1. It parses as a URL
/// 2. Its origin (scheme + host + port) equals `origin`'s origin
/// 3. It matches none of `exclude_patterns` (tested against the full URL)
/// 4. Its path does not end in a known non-document extension
///
/// This function never panics; any parse failure yields `false`.
///
/// # Arguments
///
/// * `url_str` - The candidate URL
/// * `origin` - The URL whose origin defines "same site"
/// * `exclude_patterns` - Compiled exclusion regexes
pub fn is_crawlable(url_str: &str, origin: &Url, exclude_patterns: &[Regex]) -> bool {
    let url = match Url::parse(url_str) {
        Ok(u) => u,
        Err(_) => return false,
    };

    if url.origin() != origin.origin() {
        return false;
    }

    if exclude_patterns.iter().any(|p| p.is_match(url_str)) {
        return false;
    }

    let path = url.path().to_lowercase();
    if SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }

    true
}

/// Extracts the lowercased host from a URL
///
/// Used for key derivation and reporting. Returns `None` for URLs without
/// a host component.
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    #[test]
    fn test_accepts_same_origin_path() {
        assert!(is_crawlable("https://example.com/about", &origin(), &[]));
    }

    #[test]
    fn test_accepts_same_origin_with_query() {
        assert!(is_crawlable("https://example.com/search?q=x", &origin(), &[]));
    }

    #[test]
    fn test_rejects_cross_origin() {
        assert!(!is_crawlable("https://other.com/about", &origin(), &[]));
    }

    #[test]
    fn test_rejects_different_scheme() {
        assert!(!is_crawlable("http://example.com/about", &origin(), &[]));
    }

    #[test]
    fn test_rejects_different_port() {
        assert!(!is_crawlable("https://example.com:8443/about", &origin(), &[]));
    }

    #[test]
    fn test_rejects_pdf() {
        assert!(!is_crawlable("https://example.com/file.pdf", &origin(), &[]));
    }

    #[test]
    fn test_rejects_image_extensions() {
        for ext in ["jpg", "jpeg", "png", "gif", "svg", "webp", "ico"] {
            let url = format!("https://example.com/pic.{}", ext);
            assert!(!is_crawlable(&url, &origin(), &[]), "accepted {}", url);
        }
    }

    #[test]
    fn test_rejects_uppercase_extension() {
        assert!(!is_crawlable("https://example.com/file.PDF", &origin(), &[]));
    }

    #[test]
    fn test_rejects_excluded_pattern() {
        let patterns = vec![Regex::new(r"/admin/").unwrap()];
        assert!(!is_crawlable(
            "https://example.com/admin/users",
            &origin(),
            &patterns
        ));
        assert!(is_crawlable(
            "https://example.com/public/users",
            &origin(),
            &patterns
        ));
    }

    #[test]
    fn test_rejects_unparseable() {
        assert!(!is_crawlable("::not a url::", &origin(), &[]));
    }

    #[test]
    fn test_extract_domain() {
        let url = Url::parse("https://Example.COM/page").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_domain_with_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }
}
