//! Shared fixtures for the service tests.

use crate::domain::value_objects::DagIndexConfig;
use crate::ports::inbound::DagIndexApi;
use crate::ports::outbound::{BlockInfoStore, InMemoryBlockInfoStore, InMemoryKVStore};
use crate::service::{DagIndexDependencies, DagIndexService};
use shared_types::{BlockHash, BlockHeight, BlockInfo};

pub type TestService = DagIndexService<InMemoryKVStore, InMemoryBlockInfoStore>;

/// The all-zero genesis sentinel used throughout the tests.
pub const GENESIS: BlockHash = BlockHash::ZERO;

/// Deterministic hash from a tag byte.
pub fn hash(tag: u8) -> BlockHash {
    BlockHash::new([tag; 32])
}

/// Block metadata with a tagged hash.
pub fn block(tag: u8, height: BlockHeight, parents: &[BlockHash]) -> BlockInfo {
    BlockInfo::new(hash(tag), height, parents.to_vec(), 0)
}

/// A linear chain: genesis plus `len - 1` blocks, block `i` at height `i`.
pub fn chain(len: u8) -> Vec<BlockInfo> {
    let mut blocks = vec![block(0, 0, &[])];
    for i in 1..len {
        blocks.push(block(i, i as u64, &[hash(i - 1)]));
    }
    blocks
}

/// Service over in-memory stores, with a small paging stride so a handful of
/// blocks spans several pages.
pub fn make_service() -> TestService {
    make_service_with(DagIndexConfig::new().with_step(4))
}

/// Service over in-memory stores with an explicit configuration.
pub fn make_service_with(config: DagIndexConfig) -> TestService {
    let deps = DagIndexDependencies {
        kv_store: InMemoryKVStore::new(),
        block_store: InMemoryBlockInfoStore::new(),
    };
    DagIndexService::new(deps, config)
}

/// Save every block's metadata, then index them in order.
pub fn index_all(service: &mut TestService, blocks: Vec<BlockInfo>) {
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    for info in &blocks {
        service.add_block(info).unwrap();
    }
}
