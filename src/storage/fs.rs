//! Filesystem-backed storage sink

use crate::storage::{StorageError, StorageSink};
use std::path::{Component, Path, PathBuf};

/// Stores objects as files under a root directory
///
/// Keys map directly to relative paths; parent directories are created on
/// demand. Keys that would escape the root are rejected.
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a key to a path under the root, rejecting traversal
    fn resolve(&self, key: &str) -> std::result::Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey("empty key".to_string()));
        }

        let relative = Path::new(key);
        let valid = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.root.join(relative))
    }
}

impl StorageSink for FsSink {
    fn put(
        &self,
        key: &str,
        bytes: &[u8],
        _content_type: &str,
    ) -> std::result::Result<(), StorageError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, bytes)?;

        tracing::debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(())
    }
}
