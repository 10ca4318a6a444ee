//! Site discovery
//!
//! Everything needed to map a site before crawling it: sitemap resolution,
//! structure aggregation, and the service tying them together.

mod service;
mod sitemap;
mod structure;

pub use service::DiscoveryService;
pub use sitemap::SitemapResolver;
pub use structure::{analyze_structure, SiteStructure};
