//! # Page Cache (Bounded LRU)
//!
//! Keeps the most recently touched pages deserialized in memory.
//!
//! The cache is never authoritative: every page mutation is paired with a
//! backend write in the same critical section, so an eviction can only cost
//! a re-read, never data.

use crate::domain::page::{PageIndex, PageRecord};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded LRU mapping from page index to its deserialized record.
pub struct PageCache {
    cache: LruCache<PageIndex, PageRecord>,
    hits: u64,
    misses: u64,
}

impl PageCache {
    /// Create a cache holding at most `capacity` pages (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            cache: LruCache::new(cap),
            hits: 0,
            misses: 0,
        }
    }

    /// Fetch a page and refresh its recency.
    pub fn lookup(&mut self, page_index: PageIndex) -> Option<&PageRecord> {
        match self.cache.get(&page_index) {
            Some(record) => {
                self.hits += 1;
                Some(record)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a page, evicting the least recently used entries at capacity.
    pub fn insert(&mut self, page_index: PageIndex, record: PageRecord) {
        self.cache.put(page_index, record);
    }

    /// Drop a single page.
    pub fn invalidate(&mut self, page_index: PageIndex) {
        self.cache.pop(&page_index);
    }

    /// Drop every page. Used when the index switches generations.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    /// Number of pages currently held.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Cache statistics for monitoring.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.len(),
            capacity: self.cache.cap().get(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Pages currently held.
    pub entries: usize,
    /// Maximum pages the cache may hold.
    pub capacity: usize,
    /// Lookups answered from memory.
    pub hits: u64,
    /// Lookups that fell through to the backend.
    pub misses: u64,
}
