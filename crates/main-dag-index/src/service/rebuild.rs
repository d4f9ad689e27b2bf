//! # Startup Reconstruction
//!
//! Rebuilds the index from persisted block metadata: starting at the DAG
//! tips (pending blocks, else stable ones) and walking parent pointers down
//! toward genesis, re-adding every block on the way.
//!
//! This is the only writer of historical edges; at steady state only the
//! block processor writes.

use super::DagIndexService;
use crate::domain::errors::DagIndexError;
use crate::ports::inbound::DagIndexApi;
use crate::ports::outbound::{BlockInfoStore, KeyValueStore};
use shared_types::BlockHash;
use std::collections::HashSet;

impl<KV, BS> DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    /// Rebuild the index into a fresh generation.
    ///
    /// The frontier starts at `pending_hashes`, or at `stable_hashes` when
    /// nothing is pending. Every frontier block is re-added and its
    /// not-yet-indexed parents queued, until the walk reaches genesis.
    ///
    /// ## Errors
    ///
    /// - `RebuildMissingBlock`: a frontier hash has no block record. The
    ///   store is corrupt; the caller must not boot on it.
    /// - `RebuildBadBlock`: a frontier block is marked bad.
    ///
    /// Returns the number of blocks indexed.
    pub fn rebuild(
        &mut self,
        stable_hashes: &[BlockHash],
        pending_hashes: &[BlockHash],
    ) -> Result<usize, DagIndexError> {
        self.drop_all_for_reindex();

        let mut frontier: Vec<BlockHash> = if pending_hashes.is_empty() {
            stable_hashes.to_vec()
        } else {
            pending_hashes.to_vec()
        };
        let mut queued: HashSet<BlockHash> = frontier.iter().copied().collect();
        let mut indexed = 0usize;

        tracing::info!(
            "[dag-index] rebuilding from {} tip hash(es)",
            frontier.len()
        );

        let genesis = self.config.genesis_hash;
        while !frontier.is_empty() {
            // The walk is done once only an already-indexed genesis remains.
            if frontier.iter().all(|hash| *hash == genesis) && self.has(&genesis, Some(0)) {
                break;
            }

            let mut next: Vec<BlockHash> = Vec::new();
            for hash in frontier.drain(..) {
                let Some(info) = self.block_store.get_block_info(&hash) else {
                    return Err(DagIndexError::RebuildMissingBlock { hash });
                };
                if info.is_bad {
                    return Err(DagIndexError::RebuildBadBlock { hash });
                }

                self.add_block(&info)?;
                indexed += 1;

                for parent in &info.parent_hashes {
                    if queued.insert(*parent) && !self.has(parent, None) {
                        next.push(*parent);
                    }
                }
            }

            frontier = next;
        }

        tracing::info!(
            "[dag-index] rebuild complete: {} blocks in generation {}",
            indexed,
            self.prefix
        );
        Ok(indexed)
    }

    /// Rebuild using the tip hashes the block store currently reports.
    pub fn rebuild_from_store(&mut self) -> Result<usize, DagIndexError> {
        let pending = self.block_store.get_pending_block_hashes();
        let stable = self.block_store.get_last_applied_block_hashes();
        self.rebuild(&stable, &pending)
    }
}
