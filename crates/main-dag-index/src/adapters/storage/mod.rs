//! # Storage Adapters
//!
//! Production persistence for the index.
//!
//! ## Modules
//!
//! - `rocksdb_adapter`: RocksDB implementation of the `KeyValueStore` port

mod rocksdb_adapter;

pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};
