//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, SnapshotEntry};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub insertions: u64,
    pub rejected: u64,
    pub total_entries: usize,
    pub total_bytes: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    pub max_cache_size: usize,
    pub max_object_size: usize,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and limits
    pub fn new(stats: &CacheStats, max_cache_size: usize, max_object_size: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            insertions: stats.insertions,
            rejected: stats.rejected,
            total_entries: stats.total_entries,
            total_bytes: stats.total_bytes,
            hit_rate: stats.hit_rate(),
            max_cache_size,
            max_object_size,
        }
    }
}

/// Response body for the cache dump endpoint (GET /cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheDumpResponse {
    pub total_bytes: usize,
    /// Most recently used first
    pub entries: Vec<SnapshotEntry>,
}

impl CacheDumpResponse {
    pub fn new(entries: Vec<SnapshotEntry>) -> Self {
        Self {
            total_bytes: entries.iter().map(|e| e.size).sum(),
            entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
