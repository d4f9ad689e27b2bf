//! # Inbound Ports (Driving Ports)
//!
//! The public APIs of the Main DAG Index.
//!
//! `DagIndexApi` is consumed by the block processor after each accepted
//! block; `DagWalkerApi` by the peer-sync handler when answering inventory
//! requests.

use crate::domain::errors::DagIndexError;
use shared_types::{BlockHash, BlockHeight, BlockInfo};
use std::collections::{HashMap, HashSet};

/// Primary API of the DAG index.
///
/// Receivers are `&mut self`: the cache refreshes recency on every read, and
/// each operation must be a single serialisable unit with respect to other
/// callers. Reads that hit a failing KV backend degrade to conservative
/// answers (`false` / `None` / empty) instead of propagating.
pub trait DagIndexApi {
    /// Index a block: create child entries on each direct parent's page and
    /// record the block as a processed vertex on its own page.
    ///
    /// Idempotent: re-adding an indexed block changes nothing, including the
    /// order counter. Parents whose metadata is unavailable are skipped (a
    /// reorg may deliver children before their parents are stored); parents
    /// more than one height below contribute no child entry.
    ///
    /// ## Errors
    ///
    /// - `Storage`: the KV backend rejected a page or counter write.
    /// - `Serialization`: a page record could not be encoded.
    fn add_block(&mut self, info: &BlockInfo) -> Result<(), DagIndexError>;

    /// Remove a block: delete its vertex row, prune it from each parent's
    /// child map, and drop parent placeholder rows left without children.
    ///
    /// The order counter decrements for the vertex row and for each fully
    /// removed placeholder row.
    fn remove_block(&mut self, info: &BlockInfo) -> Result<(), DagIndexError>;

    /// Whether the block is indexed as a processed vertex.
    ///
    /// With `height` absent, the height is resolved through the block store;
    /// an unknown block answers `false`.
    fn has(&mut self, hash: &BlockHash, height: Option<BlockHeight>) -> bool;

    /// Height of an indexed block, `None` when the block is unknown to the
    /// store or not a processed vertex.
    fn get_block_height(&mut self, hash: &BlockHash) -> Option<BlockHeight>;

    /// Block metadata for an indexed block, `None` under the same conditions
    /// as [`DagIndexApi::get_block_height`].
    fn get_block_info(&mut self, hash: &BlockHash) -> Option<BlockInfo>;

    /// Direct children of a processed vertex: each child hash mapped to its
    /// height. Empty when the block is absent or a mere placeholder.
    fn get_children(
        &mut self,
        hash: &BlockHash,
        height: BlockHeight,
    ) -> HashMap<BlockHash, BlockHeight>;

    /// Total index rows ever inserted in this generation (vertices and
    /// placeholders), net of removals. An approximate metric: a failed write
    /// retried by the caller may skew it.
    fn get_order(&self) -> u64;

    /// Start a fresh index generation: new dag-prefix, empty cache, counter
    /// at zero. Keys of the old generation stay in the store untouched.
    fn drop_all_for_reindex(&mut self);
}

/// Descendant enumeration for peer sync.
pub trait DagWalkerApi {
    /// Starting from hashes the peer claims to know, collect the hashes of
    /// blocks reachable forward through direct-child edges, up to the
    /// configured response cap (soft: the level in flight completes).
    ///
    /// When no claimed hash is indexed, the peer is on a divergent DAG and
    /// is seeded from genesis instead; when even genesis is absent the
    /// result is empty. Weakly consistent with concurrent writers: the walk
    /// may miss a block added mid-flight, never fabricates one.
    fn blocks_from_last_known(&mut self, last_known: &[BlockHash]) -> HashSet<BlockHash>;
}
