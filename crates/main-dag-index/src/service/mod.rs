//! # DAG Index Service
//!
//! The main service implementing the Main DAG Index APIs.
//!
//! ## Architecture
//!
//! This service:
//! 1. Implements `DagIndexApi` for block add/remove and index queries
//! 2. Implements `DagWalkerApi` for peer-sync descendant enumeration
//! 3. Rebuilds the index from block metadata on startup (`rebuild`)
//! 4. Uses dependency injection for the KV store and the block store
//!
//! ## Concurrency
//!
//! Public operations take `&mut self` and are single serialisable units.
//! Underneath, every backend call holds its named lock (`dagIndexPage` or
//! `dagIndexOrder`) for the call's duration, serialising access to the
//! shared physical store. The page cache is touched only by operations that
//! pair the mutation with a backend write under the page lock.

mod backend;
mod index;
mod rebuild;
#[cfg(test)]
mod tests;
mod walker;

pub use backend::IndexBackend;

use crate::domain::cache::{CacheStats, PageCache};
use crate::domain::errors::DagIndexError;
use crate::domain::metrics::DagIndexMetrics;
use crate::domain::page::{page_index_for_height, PageIndex, PageRecord};
use crate::domain::value_objects::{DagIndexConfig, DagPrefix};
use crate::ports::outbound::{BlockInfoStore, KeyValueStore};
use shared_types::BlockHeight;

/// The Main DAG Index service.
///
/// Owns the current index generation: the dag-prefix namespacing its keys,
/// the bounded page cache, and the backend wrapping the KV store.
pub struct DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    /// Page and order-counter slices of the KV store.
    pub(crate) backend: IndexBackend<KV>,
    /// Block metadata lookups (parent resolution, height queries).
    pub(crate) block_store: BS,
    /// Bounded LRU cache over deserialized pages.
    pub(crate) cache: PageCache,
    /// Namespace of the current index generation.
    pub(crate) prefix: DagPrefix,
    /// Service configuration.
    pub(crate) config: DagIndexConfig,
    /// Operation counters.
    pub(crate) metrics: DagIndexMetrics,
}

/// Dependencies for `DagIndexService`.
pub struct DagIndexDependencies<KV, BS> {
    /// Key-value store holding pages and the order counter.
    pub kv_store: KV,
    /// The node's block metadata store.
    pub block_store: BS,
}

impl<KV, BS> DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    /// Create a service over the given stores, starting a fresh index
    /// generation.
    pub fn new(deps: DagIndexDependencies<KV, BS>, config: DagIndexConfig) -> Self {
        let prefix = DagPrefix::generate();
        tracing::info!("[dag-index] starting index generation {}", prefix);

        Self {
            backend: IndexBackend::new(deps.kv_store),
            block_store: deps.block_store,
            cache: PageCache::new(config.pages_in_memory),
            prefix,
            config,
            metrics: DagIndexMetrics::new(),
        }
    }

    /// The active dag-prefix.
    pub fn prefix(&self) -> &DagPrefix {
        &self.prefix
    }

    /// The block metadata store.
    pub fn block_store(&self) -> &BS {
        &self.block_store
    }

    /// Mutable access to the block metadata store.
    pub fn block_store_mut(&mut self) -> &mut BS {
        &mut self.block_store
    }

    /// The service configuration.
    pub fn config(&self) -> &DagIndexConfig {
        &self.config
    }

    /// Operation counters.
    pub fn metrics(&self) -> DagIndexMetrics {
        self.metrics.snapshot()
    }

    /// Page cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Page index of the bucket holding `height`.
    pub(crate) fn page_index(&self, height: BlockHeight) -> PageIndex {
        page_index_for_height(height, self.config.step)
    }

    /// Fetch a page, consulting the cache before the backend. A backend hit
    /// fills the cache so a later access skips the store.
    pub(crate) fn load_page(&mut self, page_index: PageIndex) -> Option<PageRecord> {
        if let Some(record) = self.cache.lookup(page_index) {
            return Some(record.clone());
        }
        let record = self.backend.get_page(&self.prefix, page_index)?;
        self.cache.insert(page_index, record.clone());
        Some(record)
    }

    /// Persist a mutated page and refresh the cached copy.
    ///
    /// Backend first: if the write fails the cache keeps the old record,
    /// matching what the store still holds.
    pub(crate) fn flush_page(
        &mut self,
        page_index: PageIndex,
        record: PageRecord,
    ) -> Result<(), DagIndexError> {
        self.backend.set_page(&self.prefix, page_index, &record)?;
        self.cache.insert(page_index, record);
        Ok(())
    }
}
