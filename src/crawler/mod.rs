//! Breadth-first crawl engine
//!
//! [`Frontier`] drives the traversal; `resources` holds the asset
//! classification and download policy it delegates to.

mod frontier;
pub mod resources;

pub use frontier::{CrawlRequest, Frontier, PageResult};
pub use resources::{PageResource, ResourceKind};
