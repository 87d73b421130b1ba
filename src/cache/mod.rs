//! Cache Module
//!
//! In-memory object cache bounded by total payload bytes, with LRU eviction.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::{CacheStore, EntryInfo, InsertReport, SnapshotEntry};

// == Public Constants ==
/// Default upper bound on the sum of cached payload sizes, in bytes
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1_049_000;

/// Default largest cacheable response, in bytes
pub const DEFAULT_MAX_OBJECT_SIZE: usize = 102_400;
