//! Shared Cache Handle
//!
//! Thread-safe service object wrapping a [`CacheStore`] behind one lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheStats, CacheStore, EntryInfo, InsertReport, SnapshotEntry};
use crate::config::Config;
use crate::error::CacheError;

/// Cloneable handle to the process-wide object cache.
///
/// Every operation holds the single mutex for its whole duration and does
/// only memory work under it. There is no reader/writer split because a
/// lookup reorders the recency list.
#[derive(Debug, Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<CacheStore>>,
    max_cache_size: usize,
    max_object_size: usize,
}

impl SharedCache {
    /// Wraps an existing store.
    pub fn new(store: CacheStore) -> Self {
        Self {
            max_cache_size: store.max_cache_size(),
            max_object_size: store.max_object_size(),
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Creates an empty cache sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.max_cache_size, config.max_object_size))
    }

    /// Copies out the payload for `uri` and promotes it.
    pub async fn lookup(&self, uri: &str) -> Option<Vec<u8>> {
        self.inner.lock().await.lookup(uri)
    }

    /// Stores a copy of `payload` under `uri`, evicting as needed.
    pub async fn insert(&self, uri: &str, payload: &[u8]) -> Result<InsertReport, CacheError> {
        self.inner.lock().await.insert(uri, payload)
    }

    /// `(uri, size)` pairs, most recently used first.
    pub async fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.inner.lock().await.snapshot()
    }

    pub async fn peek(&self, uri: &str) -> Option<EntryInfo> {
        self.inner.lock().await.peek(uri)
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats()
    }

    /// Capacity in payload bytes. Fixed at construction, readable without the lock.
    pub fn max_cache_size(&self) -> usize {
        self.max_cache_size
    }

    /// Largest cacheable payload. Fixed at construction, readable without the lock.
    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }
}
