//! # DAG Index API Implementation
//!
//! Implements `DagIndexApi`: block add/remove and index queries.

use super::DagIndexService;
use crate::domain::errors::DagIndexError;
use crate::domain::page::PageEntry;
use crate::domain::value_objects::DagPrefix;
use crate::ports::inbound::DagIndexApi;
use crate::ports::outbound::{BlockInfoStore, KeyValueStore};
use shared_types::{BlockHash, BlockHeight, BlockInfo};
use std::collections::HashMap;

impl<KV, BS> DagIndexApi for DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    fn add_block(&mut self, info: &BlockInfo) -> Result<(), DagIndexError> {
        let hash = info.hash;
        let height = info.height;

        // Genesis has no indexable parents.
        if hash != self.config.genesis_hash {
            for parent in &info.parent_hashes {
                self.link_parent(parent, hash, height)?;
            }
        }

        let page_index = self.page_index(height);
        let mut page = self.load_page(page_index).unwrap_or_default();

        let inserted = match page.get_mut(&hash) {
            // Placeholder left by an earlier child: promote, keep children.
            Some(entry) if !entry.processed => {
                entry.processed = true;
                false
            }
            // Already a processed vertex; re-adding is a no-op.
            Some(_) => return Ok(()),
            None => {
                page.insert(hash, PageEntry::vertex());
                true
            }
        };

        self.flush_page(page_index, page)?;
        if inserted {
            self.backend.adjust_order(&self.prefix, 1)?;
        }
        self.metrics.on_block_indexed();
        Ok(())
    }

    fn remove_block(&mut self, info: &BlockInfo) -> Result<(), DagIndexError> {
        let hash = info.hash;
        let page_index = self.page_index(info.height);

        let Some(mut page) = self.load_page(page_index) else {
            return Ok(());
        };

        if page.remove(&hash).is_some() {
            self.flush_page(page_index, page)?;
            self.backend.adjust_order(&self.prefix, -1)?;
            self.metrics.on_block_removed();
        }

        for parent in &info.parent_hashes {
            self.unlink_parent(parent, &hash)?;
        }
        Ok(())
    }

    fn has(&mut self, hash: &BlockHash, height: Option<BlockHeight>) -> bool {
        let height = match height {
            Some(height) => height,
            None => match self.block_store.get_block_info(hash) {
                Some(info) => info.height,
                None => return false,
            },
        };

        let page_index = self.page_index(height);
        self.load_page(page_index)
            .and_then(|page| page.get(hash).map(|entry| entry.processed))
            .unwrap_or(false)
    }

    fn get_block_height(&mut self, hash: &BlockHash) -> Option<BlockHeight> {
        let info = self.block_store.get_block_info(hash)?;
        self.has(hash, Some(info.height)).then_some(info.height)
    }

    fn get_block_info(&mut self, hash: &BlockHash) -> Option<BlockInfo> {
        let info = self.block_store.get_block_info(hash)?;
        self.has(hash, Some(info.height)).then_some(info)
    }

    fn get_children(
        &mut self,
        hash: &BlockHash,
        height: BlockHeight,
    ) -> HashMap<BlockHash, BlockHeight> {
        let page_index = self.page_index(height);
        self.load_page(page_index)
            .and_then(|page| {
                page.get(hash)
                    .filter(|entry| entry.processed)
                    .map(|entry| entry.children.clone())
            })
            .unwrap_or_default()
    }

    fn get_order(&self) -> u64 {
        self.backend.get_order(&self.prefix)
    }

    fn drop_all_for_reindex(&mut self) {
        let retired = std::mem::replace(&mut self.prefix, DagPrefix::generate());
        self.cache.clear();
        self.metrics = Default::default();
        tracing::info!(
            "[dag-index] re-index: generation {} retired, {} active",
            retired,
            self.prefix
        );
    }
}

impl<KV, BS> DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    /// Record `child` on its parent's page.
    ///
    /// Only direct parents (exactly one height below the child) get a child
    /// entry; an absent parent row is created as a placeholder and counted.
    /// Parents the block store cannot resolve are skipped: during a reorg
    /// the child can legitimately arrive first.
    fn link_parent(
        &mut self,
        parent: &BlockHash,
        child: BlockHash,
        child_height: BlockHeight,
    ) -> Result<(), DagIndexError> {
        let Some(parent_info) = self.block_store.get_block_info(parent) else {
            self.metrics.on_missing_parent();
            tracing::debug!(
                "[dag-index] no block record for parent {} of {}, edge skipped",
                parent,
                child
            );
            return Ok(());
        };

        // Gap edge: child more than one height above the parent.
        if child_height != parent_info.height + 1 {
            return Ok(());
        }

        let page_index = self.page_index(parent_info.height);
        let mut page = self.load_page(page_index).unwrap_or_default();

        let inserted = match page.get_mut(parent) {
            Some(entry) => {
                entry.children.insert(child, child_height);
                false
            }
            None => {
                page.insert(*parent, PageEntry::placeholder(child, child_height));
                true
            }
        };

        self.flush_page(page_index, page)?;
        if inserted {
            self.backend.adjust_order(&self.prefix, 1)?;
        }
        Ok(())
    }

    /// Drop `child` from its parent's child map; a placeholder row left
    /// without children is removed entirely and uncounted.
    fn unlink_parent(
        &mut self,
        parent: &BlockHash,
        child: &BlockHash,
    ) -> Result<(), DagIndexError> {
        let Some(parent_info) = self.block_store.get_block_info(parent) else {
            return Ok(());
        };

        let page_index = self.page_index(parent_info.height);
        let Some(mut page) = self.load_page(page_index) else {
            return Ok(());
        };

        let (removed, prune_row) = match page.get_mut(parent) {
            Some(entry) => {
                let removed = entry.children.remove(child).is_some();
                let prune_row = removed && entry.children.is_empty() && !entry.processed;
                (removed, prune_row)
            }
            None => (false, false),
        };

        if !removed {
            return Ok(());
        }

        if prune_row {
            page.remove(parent);
        }
        self.flush_page(page_index, page)?;
        if prune_row {
            self.backend.adjust_order(&self.prefix, -1)?;
        }
        Ok(())
    }
}
