//! Cache Module
//!
//! Bounded in-process LRU cache fronting repository reads, plus the key
//! convention the services use to address entries.

mod bounded;
mod entry;
pub mod keys;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use bounded::BoundedCache;
pub use entry::CacheEntry;
pub use keys::CacheKey;
pub use lru::{LruList, NodeId};
pub use stats::CacheStats;
pub use store::LruStore;

// == Public Constants ==
/// Capacity used when `CACHE_MAX_SIZE` is unset
pub const DEFAULT_MAX_ENTRIES: i64 = 100;

/// Sweep interval in seconds used when `CACHE_SWEEP_INTERVAL` is unset
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;
