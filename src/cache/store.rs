//! LRU Store Module
//!
//! Unsynchronized cache engine combining a HashMap with an access-order list.
//! [`BoundedCache`](crate::cache::BoundedCache) wraps it in a lock.

use std::collections::HashMap;

use crate::cache::{CacheEntry, CacheStats, LruList};

// == LRU Store ==
/// Fixed-capacity key/value storage with least-recently-used eviction.
#[derive(Debug)]
pub struct LruStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Access order, head = most recent
    order: LruList<String>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<V: Clone> LruStore<V> {
    // == Constructor ==
    /// Creates an empty store. Capacity is validated by the caller.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: LruList::with_capacity(capacity),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Get ==
    /// Returns a clone of the value and promotes the key to most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_map(key, |value| Some(value.clone()))
    }

    /// Looks up `key` and projects the value through `pick`.
    ///
    /// Only a `Some` projection counts as a hit and promotes the key. An
    /// entry that `pick` rejects counts as a miss and keeps its position.
    pub fn get_map<R>(&mut self, key: &str, pick: impl FnOnce(&V) -> Option<R>) -> Option<R> {
        let picked = self
            .entries
            .get(key)
            .and_then(|entry| pick(&entry.value).map(|value| (value, entry.node)));

        match picked {
            Some((value, node)) => {
                self.order.move_to_front(node);
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Inserts or overwrites a value.
    ///
    /// Overwriting promotes the key and never evicts. Inserting a new key into
    /// a full store evicts exactly one entry, the least recently used one,
    /// whose key is returned.
    pub fn put(&mut self, key: String, value: V) -> Option<String> {
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            let node = entry.node;
            self.order.move_to_front(node);
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        let node = self.order.push_front(key.clone());
        self.entries.insert(key, CacheEntry::new(value, node));
        self.stats.set_total_entries(self.entries.len());

        evicted
    }

    // == Remove ==
    /// Deletes a key. Returns false when the key was absent.
    pub fn remove(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.order.remove(entry.node);
                self.stats.set_total_entries(self.entries.len());
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Drops every entry and returns how many were held.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order.clear();
        self.stats.record_clear();
        self.stats.set_total_entries(0);
        dropped
    }

    // == Introspection ==
    /// Snapshot of the current values in unspecified order.
    pub fn values(&self) -> Vec<V> {
        self.entries.values().map(|entry| entry.value.clone()).collect()
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Key that the next eviction would remove.
    pub fn eviction_candidate(&self) -> Option<&str> {
        self.order.peek_back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
