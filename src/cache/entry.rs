//! Cache Entry Module
//!
//! Defines the structure for individual cached responses.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// A single cached response payload and its metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Raw response bytes, immutable once stored
    payload: Vec<u8>,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Last lookup or insertion timestamp (Unix milliseconds)
    pub last_access: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry from a copy of the response bytes.
    pub fn new(payload: &[u8]) -> Self {
        let now = current_timestamp_ms();
        Self {
            payload: payload.to_vec(),
            stored_at: now,
            last_access: now,
        }
    }

    // == Size ==
    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.payload.len()
    }

    // == Copy Out ==
    /// Returns an owned copy of the payload and records the access.
    pub fn copy_payload(&mut self) -> Vec<u8> {
        self.last_access = current_timestamp_ms();
        self.payload.clone()
    }

    /// Borrowed view of the payload.
    #[allow(dead_code)]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
