//! # Outbound Ports (Driven Ports)
//!
//! Capabilities the Main DAG Index requires the host application to provide.
//!
//! Production adapters live in `adapters/storage`; the in-memory
//! implementations below serve unit tests and light development nodes.

use crate::domain::errors::KVStoreError;
use shared_types::{BlockHash, BlockInfo};
use std::collections::HashMap;

/// Abstract interface for the ordered key-value store backing the index.
///
/// Production: `RocksDbStore` (adapters/storage/rocksdb_adapter.rs).
/// Testing: `InMemoryKVStore` (below).
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key. A missing key is `Ok(None)`, never an error.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key. Deleting a missing key succeeds.
    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError>;
}

/// Abstract interface to the node's block metadata store.
///
/// Absence is a normal answer, not an error: during reorgs the index is
/// routinely asked about parents whose metadata has not arrived yet.
pub trait BlockInfoStore: Send + Sync {
    /// Metadata for a block, if the store has it.
    fn get_block_info(&self, hash: &BlockHash) -> Option<BlockInfo>;

    /// Whether the store has metadata for a block.
    fn has_block(&self, hash: &BlockHash) -> bool {
        self.get_block_info(hash).is_some()
    }

    /// Persist block metadata.
    fn save_block_info(&mut self, info: BlockInfo);

    /// Hashes of the blocks most recently applied to stable state.
    fn get_last_applied_block_hashes(&self) -> Vec<BlockHash>;

    /// Hashes of blocks accepted but not yet stable.
    fn get_pending_block_hashes(&self) -> Vec<BlockHash>;
}

// =============================================================================
// ADAPTER IMPLEMENTATIONS
// Production: RocksDbStore in adapters/storage/rocksdb_adapter.rs
// Testing: In-memory implementations below
// =============================================================================

/// In-memory key-value store for unit tests.
#[derive(Default)]
pub struct InMemoryKVStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl InMemoryKVStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.remove(key);
        Ok(())
    }
}

/// Controllable key-value store for failure-path tests.
///
/// Reads and writes can be failed independently to verify the downgrade
/// policy: failing reads must look like absence, failing writes must surface.
#[derive(Default)]
pub struct FaultyKVStore {
    inner: InMemoryKVStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FaultyKVStore {
    /// Healthy store; inject faults with the setters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `get` fail until reset.
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every `put`/`delete` fail until reset.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for FaultyKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        if self.fail_reads {
            return Err(KVStoreError::IOError {
                message: "injected read failure".to_string(),
            });
        }
        self.inner.get(key)
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        if self.fail_writes {
            return Err(KVStoreError::IOError {
                message: "injected write failure".to_string(),
            });
        }
        self.inner.put(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), KVStoreError> {
        if self.fail_writes {
            return Err(KVStoreError::IOError {
                message: "injected write failure".to_string(),
            });
        }
        self.inner.delete(key)
    }
}

/// In-memory block metadata store for unit tests.
#[derive(Default)]
pub struct InMemoryBlockInfoStore {
    blocks: HashMap<BlockHash, BlockInfo>,
    last_applied: Vec<BlockHash>,
    pending: Vec<BlockHash>,
}

impl InMemoryBlockInfoStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with block metadata.
    pub fn with_blocks(blocks: impl IntoIterator<Item = BlockInfo>) -> Self {
        let mut store = Self::new();
        for info in blocks {
            store.save_block_info(info);
        }
        store
    }

    /// Set the stable tip hashes returned to the re-builder.
    pub fn set_last_applied(&mut self, hashes: Vec<BlockHash>) {
        self.last_applied = hashes;
    }

    /// Set the pending tip hashes returned to the re-builder.
    pub fn set_pending(&mut self, hashes: Vec<BlockHash>) {
        self.pending = hashes;
    }

    /// Forget a block, simulating a hole in the store.
    pub fn remove_block(&mut self, hash: &BlockHash) {
        self.blocks.remove(hash);
    }
}

impl BlockInfoStore for InMemoryBlockInfoStore {
    fn get_block_info(&self, hash: &BlockHash) -> Option<BlockInfo> {
        self.blocks.get(hash).cloned()
    }

    fn save_block_info(&mut self, info: BlockInfo) {
        self.blocks.insert(info.hash, info);
    }

    fn get_last_applied_block_hashes(&self) -> Vec<BlockHash> {
        self.last_applied.clone()
    }

    fn get_pending_block_hashes(&self) -> Vec<BlockHash> {
        self.pending.clone()
    }
}
