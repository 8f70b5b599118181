//! DocumentStore implementation
//!
//! BTreeMap-based document with RwLock so the watcher thread can swap it.

use parking_lot::RwLock;

use super::Document;
use crate::error::{Result, StoreError};

/// In-memory key -> string mapping
///
/// Locking here only makes the map shareable. Sequences that must not
/// interleave (upsert then save, reload) are serialized by the store's
/// write lock.
#[derive(Debug, Default)]
pub struct DocumentStore {
    data: RwLock<Document>,
}

impl DocumentStore {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `document`
    pub fn from_document(document: Document) -> Self {
        Self {
            data: RwLock::new(document),
        }
    }

    /// Get the raw value for a key
    pub fn get(&self, key: &str) -> Result<String> {
        self.data
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_string()))
    }

    /// Insert or overwrite a key
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().insert(key.into(), value.into());
    }

    /// Remove a key, returning the old value
    pub fn remove(&self, key: &str) -> Option<String> {
        self.data.write().remove(key)
    }

    /// Swap in a whole new document
    pub fn replace_all(&self, document: Document) {
        *self.data.write() = document;
    }

    /// Copy of the current document
    pub fn snapshot(&self) -> Document {
        self.data.read().clone()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.read().contains_key(key)
    }

    /// All keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}
