//! # RocksDB Storage Adapter
//!
//! Production implementation of the `KeyValueStore` port.
//!
//! ## Features
//!
//! - Snappy compression
//! - Bloom filters for point lookups
//! - LRU block cache
//! - `destroy` for wiping an index store before a full re-index
//!
//! The index keeps its own small database under the node data path; no
//! column families are needed, every key already carries the dag-prefix.

use crate::domain::errors::KVStoreError;
use crate::ports::outbound::KeyValueStore;
use rocksdb::{Options, DB};
use std::path::{Path, PathBuf};

/// RocksDB configuration for the index store.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory.
    pub path: PathBuf,
    /// Block cache size in bytes (default: 32MB; index pages are small).
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB).
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability).
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/main_dag_index"),
            block_cache_size: 32 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Config for a store at `path` with production defaults.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Config for testing (small buffers, no sync).
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 4 * 1024 * 1024,
            write_buffer_size: 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store implementing the `KeyValueStore` port.
///
/// The database closes when the store is dropped.
pub struct RocksDbStore {
    db: DB,
    sync_writes: bool,
}

impl RocksDbStore {
    /// Open or create the database described by `config`.
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path).map_err(|e| KVStoreError::IOError {
            message: format!("Failed to open RocksDB at {}: {}", config.path.display(), e),
        })?;

        tracing::info!(
            "[dag-index] opened index store at {}",
            config.path.display()
        );

        Ok(Self {
            db,
            sync_writes: config.sync_writes,
        })
    }

    /// Open with production defaults at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig::at_path(path.as_ref()))
    }

    /// Wipe the database directory. The store must be closed (dropped)
    /// first; used before a full re-index from scratch.
    pub fn destroy(path: impl AsRef<Path>) -> Result<(), KVStoreError> {
        DB::destroy(&Options::default(), path.as_ref()).map_err(|e| KVStoreError::IOError {
            message: format!(
                "Failed to destroy RocksDB at {}: {}",
                path.as_ref().display(),
                e
            ),
        })
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db.get(key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB get failed: {}", e),
        })
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.sync_writes);

        self.db
            .put_opt(key, value, &write_opts)
            .map_err(|e| KVStoreError::IOError {
                message: format!("RocksDB put failed: {}", e),
            })
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.db.delete(key).map_err(|e| KVStoreError::IOError {
            message: format!("RocksDB delete failed: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rocksdb_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = RocksDbStore::open(RocksDbConfig::for_testing(temp_dir.path())).unwrap();

        store.put(b"key1", b"value1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.get(b"missing").unwrap(), None);

        store.delete(b"key1").unwrap();
        assert_eq!(store.get(b"key1").unwrap(), None);
    }

    #[test]
    fn test_rocksdb_reopen_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = RocksDbConfig::for_testing(temp_dir.path());

        {
            let mut store = RocksDbStore::open(config.clone()).unwrap();
            store.put(b"page_0", b"{}").unwrap();
        }

        let store = RocksDbStore::open(config).unwrap();
        assert_eq!(store.get(b"page_0").unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn test_rocksdb_destroy_wipes_data() {
        let temp_dir = TempDir::new().unwrap();
        let config = RocksDbConfig::for_testing(temp_dir.path());

        {
            let mut store = RocksDbStore::open(config.clone()).unwrap();
            store.put(b"key", b"value").unwrap();
        }

        RocksDbStore::destroy(temp_dir.path()).unwrap();

        let store = RocksDbStore::open(config).unwrap();
        assert_eq!(store.get(b"key").unwrap(), None);
    }
}
