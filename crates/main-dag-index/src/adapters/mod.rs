//! # Adapters
//!
//! External interface adapters for the Main DAG Index.
//!
//! - `lock`: the named-lock (keyed mutex) serialising backend access.
//! - `storage`: the RocksDB implementation of the `KeyValueStore` port.

pub mod lock;
pub mod storage;

pub use lock::{KeyedMutex, KeyedMutexGuard};
pub use storage::{RocksDbConfig, RocksDbStore};
