//! In-memory storage sink for tests and dry runs

use crate::storage::{StorageError, StorageSink};
use std::collections::HashMap;
use std::sync::Mutex;

/// A stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Keeps every put in a map, for inspection after a run
#[derive(Default)]
pub struct MemorySink {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The object stored under a key, if any
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().ok()?.get(key).cloned()
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Vec<String> {
        match self.objects.lock() {
            Ok(objects) => {
                let mut keys: Vec<String> = objects.keys().cloned().collect();
                keys.sort();
                keys
            }
            Err(_) => Vec::new(),
        }
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.lock().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageSink for MemorySink {
    fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> std::result::Result<(), StorageError> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| StorageError::InvalidKey("sink poisoned".to_string()))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
