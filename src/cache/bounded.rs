//! Bounded Cache Module
//!
//! Thread-safe wrapper around [`LruStore`].
//!
//! `get` reorders the recency list, so it takes the write lock just like
//! `put`, `remove` and `clear`. Only the introspection calls (`len`,
//! `values`, `stats`) share the read lock.

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, LruStore};
use crate::error::CacheError;

// == Bounded Cache ==
/// Fixed-capacity LRU cache shared across request handlers and the sweep task.
#[derive(Debug)]
pub struct BoundedCache<V> {
    inner: RwLock<LruStore<V>>,
}

impl<V: Clone> BoundedCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(0));
        }

        info!(capacity, "LRU cache created");
        Ok(Self {
            inner: RwLock::new(LruStore::new(capacity)),
        })
    }

    /// Builds a cache from a signed configuration value, rejecting `<= 0`.
    pub fn from_max_size(max_size: i64) -> Result<Self, CacheError> {
        let capacity =
            usize::try_from(max_size).map_err(|_| CacheError::InvalidCapacity(max_size))?;
        Self::new(capacity)
    }

    // == Get ==
    /// Looks up a key, promoting it to most recently used on a hit.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.inner.write().get(key);
        match value {
            Some(_) => debug!(key, "LRU cache hit"),
            None => debug!(key, "LRU cache miss"),
        }
        value
    }

    /// Like [`get`](Self::get), but only a value accepted by `pick` is a hit.
    pub fn get_map<R>(&self, key: &str, pick: impl FnOnce(&V) -> Option<R>) -> Option<R> {
        let value = self.inner.write().get_map(key, pick);
        match value {
            Some(_) => debug!(key, "LRU cache hit"),
            None => debug!(key, "LRU cache miss"),
        }
        value
    }

    // == Put ==
    /// Inserts or overwrites a value, evicting the least recently used entry
    /// when a new key would exceed capacity.
    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        debug!(key = %key, "Putting entry into LRU cache");

        let (evicted, capacity) = {
            let mut store = self.inner.write();
            (store.put(key, value), store.capacity())
        };

        if let Some(evicted) = evicted {
            info!(
                capacity,
                evicted = %evicted,
                "LRU cache limit reached, evicted least recently used entry"
            );
        }
    }

    // == Remove ==
    /// Deletes a key if present. Absent keys are a no-op.
    pub fn remove(&self, key: &str) -> bool {
        let removed = self.inner.write().remove(key);
        if removed {
            debug!(key, "Removed entry from LRU cache");
        }
        removed
    }

    // == Clear ==
    /// Drops every entry and returns how many were held.
    pub fn clear(&self) -> usize {
        let dropped = self.inner.write().clear();
        warn!(dropped, "Cleared the entire LRU cache");
        dropped
    }

    // == Introspection ==
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Snapshot of the cached values, in no particular order.
    pub fn values(&self) -> Vec<V> {
        self.inner.read().values()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn cache(capacity: usize) -> BoundedCache<i32> {
        BoundedCache::new(capacity).unwrap()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result: Result<BoundedCache<i32>, _> = BoundedCache::new(0);
        assert_eq!(result.unwrap_err(), CacheError::InvalidCapacity(0));
    }

    #[test]
    fn test_negative_max_size_rejected() {
        let result: Result<BoundedCache<i32>, _> = BoundedCache::from_max_size(-5);
        assert_eq!(result.unwrap_err(), CacheError::InvalidCapacity(-5));

        let result: Result<BoundedCache<i32>, _> = BoundedCache::from_max_size(0);
        assert!(result.is_err());

        let ok: BoundedCache<i32> = BoundedCache::from_max_size(100).unwrap();
        assert_eq!(ok.capacity(), 100);
    }

    #[test]
    fn test_eviction_correctness() {
        let cache = cache(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_recency_promotion() {
        let cache = cache(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.get("a");
        cache.put("c", 3);

        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = cache(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("a", 10);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(10));
        assert_eq!(cache.get("b"), Some(2));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cache = cache(3);
        cache.put("a", 1);

        assert!(!cache.remove("missing"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(1));
    }

    #[test]
    fn test_clear_resets_fully() {
        let cache = cache(4);
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            cache.put(*key, i as i32);
        }

        assert_eq!(cache.clear(), 3);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        for key in ["a", "b", "c"] {
            assert_eq!(cache.get(key), None);
        }
    }

    #[test]
    fn test_introspection_does_not_promote() {
        let cache = cache(2);
        cache.put("a", 1);
        cache.put("b", 2);

        let _ = cache.values();
        let _ = cache.len();
        let _ = cache.stats();
        cache.put("c", 3);

        assert_eq!(cache.get("a"), None, "values/len must not refresh recency");
    }

    #[test]
    fn test_concurrent_access_respects_capacity() {
        const CAPACITY: usize = 16;
        const THREADS: usize = 8;
        const OPS: usize = 2_000;

        let cache = Arc::new(cache(CAPACITY));

        thread::scope(|scope| {
            for t in 0..THREADS {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    // Cheap deterministic LCG per thread
                    let mut seed = (t as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                    for _ in 0..OPS {
                        seed = seed
                            .wrapping_mul(6_364_136_223_846_793_005)
                            .wrapping_add(1_442_695_040_888_963_407);
                        let key = format!("k{}", (seed >> 33) % 64);
                        match (seed >> 20) % 4 {
                            0 | 1 => cache.put(key, t as i32),
                            2 => {
                                let _ = cache.get(&key);
                            }
                            _ => {
                                cache.remove(&key);
                            }
                        }
                        assert!(cache.len() <= CAPACITY);
                    }
                });
            }

            // Concurrent sweeps
            let sweeper = Arc::clone(&cache);
            scope.spawn(move || {
                for _ in 0..50 {
                    sweeper.clear();
                    thread::yield_now();
                }
            });
        });

        assert!(cache.len() <= CAPACITY);
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.values().is_empty());
    }
}
