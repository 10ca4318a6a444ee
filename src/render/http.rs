//! HTTP page renderer
//!
//! Fetches a page with reqwest and extracts title, visible text, anchors,
//! and image candidates with scraper. Redirects are followed; the final URL
//! is reported so the frontier can rebase its origin.

use crate::render::{Anchor, ImageCandidate, PageRenderer, RenderedPage};
use crate::{PagemapError, Result};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

/// Tags whose subtrees never contribute visible page text
const TEXT_EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "footer", "noscript", "template"];

/// HTTP implementation of [`PageRenderer`]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds a renderer with the crawl-wide timeouts
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
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<RenderedPage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PagemapError::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(PagemapError::Render {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return Err(PagemapError::Render {
                url: url.to_string(),
                message: format!("Expected HTML, got {}", content_type),
            });
        }

        let body = response.text().await.map_err(|e| PagemapError::Fetch {
            url: url.to_string(),
            source: e,
        })?;

        Ok(extract_page(&body, &final_url, status.as_u16()))
    }
}

/// Parses an HTML document into a [`RenderedPage`]
pub fn extract_page(html: &str, final_url: &Url, status: u16) -> RenderedPage {
    let document = Html::parse_document(html);

    RenderedPage {
        final_url: final_url.to_string(),
        status,
        title: extract_title(&document).unwrap_or_default(),
        text_content: extract_visible_text(&document),
        anchors: extract_anchors(&document, final_url),
        images: extract_images(&document, final_url),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts visible text, skipping script/style/nav/footer subtrees
fn extract_visible_text(document: &Html) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            collect_text(body, &mut parts);
        }
    }

    parts.join(" ")
}

fn collect_text(element: ElementRef, parts: &mut Vec<String>) {
    if TEXT_EXCLUDED_TAGS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        } else if let Some(child_element) = ElementRef::wrap(child) {
            collect_text(child_element, parts);
        }
    }
}

/// Extracts all valid anchors from the HTML document
fn extract_anchors(document: &Html, base_url: &Url) -> Vec<Anchor> {
    let mut anchors = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    anchors.push(Anchor {
                        href: absolute_url,
                        text: element.text().collect::<String>().trim().to_string(),
                    });
                }
            }
        }
    }

    anchors
}

/// Extracts image candidates with their declared dimensions
fn extract_images(document: &Html, base_url: &Url) -> Vec<ImageCandidate> {
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            let Some(src) = element.value().attr("src") else {
                continue;
            };
            let Some(absolute_url) = resolve_link(src, base_url) else {
                continue;
            };

            images.push(ImageCandidate {
                src: absolute_url,
                width: element.value().attr("width").and_then(|v| v.parse().ok()),
                height: element.value().attr("height").and_then(|v| v.parse().ok()),
            });
        }
    }

    images
}

/// Resolves an href to an absolute URL and validates it
///
/// Returns None for links that should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - anything that does not resolve to http(s)
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
