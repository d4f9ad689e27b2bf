//! # Main DAG Index
//!
//! The Main DAG Index answers three questions about the block DAG without
//! loading full blocks: *is this hash one of ours?*, *what are its direct
//! children?*, and *which blocks does a peer behind us still need?*
//!
//! ## Architecture
//!
//! ```text
//! node runtime
//! ├── block processor ── add_block / remove_block
//! ├── peer-sync handler ── blocks_from_last_known
//! │
//! main-dag-index
//! ├── DagIndexService (service/) ── owns cache, dag-prefix, backend
//! ├── IndexBackend (service/backend.rs) ── page + order slices, named locks
//! ├── PageCache (domain/cache.rs) ── bounded LRU, write-through
//! ├── KeyedMutex (adapters/lock/) ── named-lock serialisation
//! └── RocksDbStore (adapters/storage/) ── KeyValueStore port
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement | Location |
//! |----|-----------|-------------|----------|
//! | 1 | One row per processed vertex | `add_block` own-row step | service/index.rs |
//! | 2 | Direct parents carry the child edge | `link_parent` | service/index.rs |
//! | 3 | Gap edges are never indexed | height check in `link_parent` | service/index.rs |
//! | 4 | Order counter tracks live rows | `adjust_order` call sites | service/index.rs |
//! | 5 | Cache never exceeds its capacity | `PageCache::insert` | domain/cache.rs |
//! | 6 | Every page mutation reaches the store | `flush_page` | service/mod.rs |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure index state (pages, cache, config, errors)
//! - `ports/` - Port traits (inbound API, outbound SPI)
//! - `service/` - The DagIndexService implementing the inbound ports
//! - `adapters/` - Named locks and the RocksDB storage adapter

#![warn(missing_docs)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export domain types
pub use domain::cache::{CacheStats, PageCache};
pub use domain::errors::{DagIndexError, KVStoreError};
pub use domain::metrics::DagIndexMetrics;
pub use domain::page::{page_index_for_height, PageEntry, PageIndex, PageRecord};
pub use domain::value_objects::{DagIndexConfig, DagPrefix};

// Re-export port traits and test adapters
pub use ports::inbound::{DagIndexApi, DagWalkerApi};
pub use ports::outbound::{
    BlockInfoStore, FaultyKVStore, InMemoryBlockInfoStore, InMemoryKVStore, KeyValueStore,
};

// Re-export adapters
pub use adapters::lock::{KeyedMutex, KeyedMutexGuard};
pub use adapters::storage::{RocksDbConfig, RocksDbStore};

// Re-export service
pub use service::{DagIndexDependencies, DagIndexService, IndexBackend};
