//! Storage sinks
//!
//! A sink is a put-by-key byte store; the crawler never reads back what it
//! wrote. [`FsSink`] maps keys onto a directory tree, [`MemorySink`] backs
//! tests and dry runs.

mod fs;
mod memory;

pub use fs::FsSink;
pub use memory::{MemorySink, StoredObject};

use thiserror::Error;

/// Errors produced by storage sinks
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// A put-by-key byte store
///
/// Keys are slash-separated derived strings (see [`crate::keys`]). A `put`
/// for an existing key overwrites it.
pub trait StorageSink: Send + Sync {
    /// Stores bytes under a key
    fn put(&self, key: &str, bytes: &[u8], content_type: &str)
        -> std::result::Result<(), StorageError>;
}
