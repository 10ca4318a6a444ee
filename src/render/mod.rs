//! Page rendering capability
//!
//! The crawl frontier only consumes the outputs of a renderer: the final URL
//! after redirects, the title, the visible text, outgoing anchors, and image
//! candidates. The default [`HttpRenderer`] fetches and parses static HTML;
//! a browser-backed implementation can be swapped in behind the same trait.

mod http;

pub use http::HttpRenderer;

use crate::Result;
use async_trait::async_trait;

/// An anchor extracted from a rendered page
#[derive(Debug, Clone)]
pub struct Anchor {
    /// Absolute http(s) URL the anchor points at
    pub href: String,

    /// Visible anchor text
    pub text: String,
}

/// An image element observed on a rendered page
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    /// Absolute URL of the image source
    pub src: String,

    /// Declared width in pixels, if any
    pub width: Option<u32>,

    /// Declared height in pixels, if any
    pub height: Option<u32>,
}

/// Everything the crawler needs from one rendered page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code
    pub status: u16,

    /// Page title (empty if the page has none)
    pub title: String,

    /// Visible text content, with script/style/nav/footer excluded
    pub text_content: String,

    /// Outgoing anchors, absolute http(s) only
    pub anchors: Vec<Anchor>,

    /// Image elements with their declared dimensions
    pub images: Vec<ImageCandidate>,
}

impl RenderedPage {
    /// The anchor hrefs, in document order
    pub fn link_hrefs(&self) -> Vec<String> {
        self.anchors.iter().map(|a| a.href.clone()).collect()
    }
}

/// The page-rendering contract consumed by the crawl frontier
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to a URL and returns the rendered page
    ///
    /// A failed navigation, a non-success status, or a non-HTML response is
    /// an error; the frontier logs it and moves on to the next queue entry.
    async fn render(&self, url: &str) -> Result<RenderedPage>;
}
