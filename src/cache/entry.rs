//! Cache Entry Module
//!
//! A stored value paired with its position in the access-order list.

use crate::cache::lru::NodeId;

// == Cache Entry ==
/// A single cached value and the handle of its recency node.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Position in the LRU list
    pub node: NodeId,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, node: NodeId) -> Self {
        Self { value, node }
    }
}
