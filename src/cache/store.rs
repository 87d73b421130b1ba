//! Cache Store Module
//!
//! Byte-bounded object store combining HashMap storage with recency tracking.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats, RecencyList};
use crate::error::CacheError;

// == Introspection Types ==
/// One line of a cache dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub uri: String,
    pub size: usize,
}

/// Metadata for a single cached URI.
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    pub uri: String,
    pub size: usize,
    /// Unix milliseconds
    pub stored_at: u64,
    /// Unix milliseconds
    pub last_access: u64,
}

/// Outcome of a successful insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// URIs evicted (least recently used first) to make room
    pub evicted: Vec<String>,
    /// Whether an entry for the same URI was replaced
    pub replaced: bool,
}

// == Cache Store ==
/// In-memory object cache bounded by total payload bytes.
///
/// Not thread-safe on its own; share it through [`super::SharedCache`].
#[derive(Debug)]
pub struct CacheStore {
    /// URI -> cached response
    entries: HashMap<String, CacheEntry>,
    /// Recency order of `entries` keys
    recency: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Sum of payload sizes across `entries`
    total_bytes: usize,
    /// Capacity in payload bytes
    max_cache_size: usize,
    /// Largest cacheable payload
    max_object_size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_cache_size` - Upper bound on the sum of payload sizes
    /// * `max_object_size` - Payloads larger than this are never stored
    pub fn new(max_cache_size: usize, max_object_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyList::new(),
            stats: CacheStats::new(),
            total_bytes: 0,
            max_cache_size,
            max_object_size,
        }
    }

    // == Lookup ==
    /// Returns a copy of the payload cached for `uri`, promoting it to most recently used.
    pub fn lookup(&mut self, uri: &str) -> Option<Vec<u8>> {
        match self.entries.get_mut(uri) {
            Some(entry) => {
                let payload = entry.copy_payload();
                self.recency.promote(uri);
                self.stats.record_hit();
                debug!(uri, size = payload.len(), "Cache hit");
                Some(payload)
            }
            None => {
                self.stats.record_miss();
                debug!(uri, "Cache miss");
                None
            }
        }
    }

    // == Insert ==
    /// Stores a copy of `payload` under `uri`.
    ///
    /// An existing entry for `uri` is replaced. Least recently used entries
    /// are evicted until the new payload fits. Refused inserts leave the
    /// store untouched.
    pub fn insert(&mut self, uri: &str, payload: &[u8]) -> Result<InsertReport, CacheError> {
        let size = payload.len();

        if size > self.max_object_size {
            self.stats.record_rejection();
            return Err(CacheError::ObjectTooLarge {
                size,
                max: self.max_object_size,
            });
        }

        if size > self.max_cache_size {
            self.stats.record_rejection();
            return Err(CacheError::CacheFull {
                size,
                capacity: self.max_cache_size,
            });
        }

        let mut report = InsertReport {
            replaced: self.remove_entry(uri),
            ..InsertReport::default()
        };

        while self.total_bytes + size > self.max_cache_size {
            let Some(victim) = self.recency.pop_lru() else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&victim) {
                self.total_bytes -= evicted.size();
                self.stats.record_eviction();
                debug!(uri = %victim, size = evicted.size(), "Evicted cache entry");
            }
            report.evicted.push(victim);
        }

        self.entries.insert(uri.to_string(), CacheEntry::new(payload));
        self.recency.promote(uri);
        self.total_bytes += size;
        self.stats.record_insertion();
        self.stats.set_occupancy(self.entries.len(), self.total_bytes);

        debug!(uri, size, total_bytes = self.total_bytes, "Added to cache");
        trace!(dump = ?self.snapshot(), "Cache contents");

        Ok(report)
    }

    fn remove_entry(&mut self, uri: &str) -> bool {
        match self.entries.remove(uri) {
            Some(old) => {
                self.recency.remove(uri);
                self.total_bytes -= old.size();
                true
            }
            None => false,
        }
    }

    // == Snapshot ==
    /// Lists `(uri, size)` pairs from most to least recently used.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.recency
            .iter()
            .filter_map(|uri| {
                self.entries.get(uri).map(|entry| SnapshotEntry {
                    uri: uri.to_string(),
                    size: entry.size(),
                })
            })
            .collect()
    }

    // == Peek ==
    /// Entry metadata without touching recency or statistics.
    pub fn peek(&self, uri: &str) -> Option<EntryInfo> {
        self.entries.get(uri).map(|entry| EntryInfo {
            uri: uri.to_string(),
            size: entry.size(),
            stored_at: entry.stored_at,
            last_access: entry.last_access,
        })
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_occupancy(self.entries.len(), self.total_bytes);
        stats
    }

    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn max_cache_size(&self) -> usize {
        self.max_cache_size
    }

    pub fn max_object_size(&self) -> usize {
        self.max_object_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
