//! Page resource classification and best-effort download
//!
//! The predicates here are plain functions so classification policy can be
//! tested and swapped independently of the traversal loop.

use crate::fetch::Fetcher;
use crate::render::RenderedPage;
use std::collections::HashSet;

/// Images with both dimensions below this are treated as icons
const MIN_CONTENT_IMAGE_DIMENSION: u32 = 50;

/// Extensions treated as downloadable documents
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx"];

/// Anchor-text keywords that signal a download link without a file extension
const DOCUMENT_INTENT_KEYWORDS: &[&str] = &["brochure", "specifications", "download"];

/// Kind of downloadable page resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Pdf,
    Other,
}

impl ResourceKind {
    /// The kind's name as stored in page records
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Pdf => "pdf",
            ResourceKind::Other => "other",
        }
    }
}

/// A downloaded asset belonging to a crawled page
#[derive(Debug, Clone)]
pub struct PageResource {
    /// The URL the asset was fetched from
    pub source_url: String,

    /// Classification of the asset
    pub kind: ResourceKind,

    /// Raw asset bytes
    pub bytes: Vec<u8>,

    /// File extension used in the derived storage key
    pub extension: String,
}

/// True when an image is probably a UI icon rather than content
///
/// Only images with both dimensions declared and both under 50px are
/// filtered; undeclared dimensions are kept.
pub fn is_probable_icon(width: Option<u32>, height: Option<u32>) -> bool {
    matches!(
        (width, height),
        (Some(w), Some(h)) if w < MIN_CONTENT_IMAGE_DIMENSION && h < MIN_CONTENT_IMAGE_DIMENSION
    )
}

/// Returns the document extension of a URL, if it has one
pub fn document_extension(url: &str) -> Option<String> {
    let ext = extension_of(url)?;
    DOCUMENT_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// True when anchor text signals a document download
pub fn has_document_intent(anchor_text: &str) -> bool {
    let text = anchor_text.to_lowercase();
    DOCUMENT_INTENT_KEYWORDS.iter().any(|kw| text.contains(kw))
}

/// Extracts the lowercased extension from a URL's last path segment
pub fn extension_of(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Collects and downloads the resource candidates of a rendered page
///
/// Candidates are content images (icons filtered out) plus document anchors,
/// deduplicated by URL. Each is fetched best-effort: a failed or non-2xx
/// fetch drops that single asset without failing the page.
pub async fn collect_resources(page: &RenderedPage, fetcher: &dyn Fetcher) -> Vec<PageResource> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates: Vec<(String, ResourceKind, String)> = Vec::new();

    for image in &page.images {
        if is_probable_icon(image.width, image.height) {
            continue;
        }
        if seen.insert(image.src.clone()) {
            let extension = extension_of(&image.src).unwrap_or_else(|| "bin".to_string());
            candidates.push((image.src.clone(), ResourceKind::Image, extension));
        }
    }

    for anchor in &page.anchors {
        let extension = document_extension(&anchor.href);
        if extension.is_none() && !has_document_intent(&anchor.text) {
            continue;
        }
        if seen.insert(anchor.href.clone()) {
            let extension = extension.unwrap_or_else(|| "bin".to_string());
            let kind = if extension == "pdf" {
                ResourceKind::Pdf
            } else {
                ResourceKind::Other
            };
            candidates.push((anchor.href.clone(), kind, extension));
        }
    }

    let mut resources = Vec::new();
    for (url, kind, extension) in candidates {
        match fetcher.fetch(&url).await {
            Ok(fetched) if fetched.is_success() => {
                resources.push(PageResource {
                    source_url: url,
                    kind,
                    bytes: fetched.bytes,
                    extension,
                });
            }
            Ok(fetched) => {
                tracing::debug!("Skipping resource {} (HTTP {})", url, fetched.status);
            }
            Err(e) => {
                tracing::debug!("Failed to fetch resource {}: {}", url, e);
            }
        }
    }

    resources
}
