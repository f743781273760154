//! Bounded operation cache used to memoize Apply.
//!
//! The cache is an associative map with a fixed entry budget chosen when the
//! diagram is configured. Running out of entries is a resource-exhaustion
//! error, not an eviction: Apply results are never silently recomputed.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{Result, RobddError};

pub struct Cache<K, V> {
    map: HashMap<K, V>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl<K, V> Cache<K, V> {
    /// Create a new cache holding at most `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");

        let capacity = 1 << bits;
        Self {
            map: HashMap::with_capacity(capacity.min(1 << 12)),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
{
    /// Get the cached result.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        if self.map.len() >= self.capacity && !self.map.contains_key(&key) {
            return Err(RobddError::CacheFull {
                capacity: self.capacity,
            });
        }
        self.map.insert(key, value);
        Ok(())
    }
}

/// Hit/miss counters of a finished operation.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

impl<K, V> From<&Cache<K, V>> for CacheStats {
    fn from(cache: &Cache<K, V>) -> Self {
        Self {
            hits: cache.hits(),
            misses: cache.misses(),
            entries: cache.len(),
        }
    }
}
