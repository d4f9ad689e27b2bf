//! # Descendant Walker
//!
//! Breadth-first enumeration of blocks reachable forward through
//! direct-child edges. Answers peer inventory requests: "starting from what
//! you claim to know, here is what you are missing".

use super::DagIndexService;
use crate::ports::inbound::{DagIndexApi, DagWalkerApi};
use crate::ports::outbound::{BlockInfoStore, KeyValueStore};
use shared_types::{BlockHash, BlockHeight};
use std::collections::{HashMap, HashSet};

impl<KV, BS> DagWalkerApi for DagIndexService<KV, BS>
where
    KV: KeyValueStore,
    BS: BlockInfoStore,
{
    fn blocks_from_last_known(&mut self, last_known: &[BlockHash]) -> HashSet<BlockHash> {
        let mut known: HashMap<BlockHash, BlockHeight> = HashMap::new();
        for hash in last_known {
            if let Some(height) = self.get_block_height(hash) {
                known.insert(*hash, height);
            }
        }

        let mut result: HashSet<BlockHash> = HashSet::new();

        if known.is_empty() {
            // None of the claimed hashes belong to our DAG: the peer is on a
            // divergent one and gets seeded from genesis.
            let genesis = self.config.genesis_hash;
            if !self.has(&genesis, Some(0)) {
                return result;
            }
            tracing::debug!(
                "[dag-index] no common blocks with peer, seeding from genesis"
            );
            known.insert(genesis, 0);
            result.insert(genesis);
        }

        let cap = self.config.max_blocks_inv;
        let mut frontier = known.clone();

        while !frontier.is_empty() && result.len() <= cap {
            let mut next: HashMap<BlockHash, BlockHeight> = HashMap::new();

            'level: for (hash, height) in &frontier {
                for (child, child_height) in self.get_children(hash, *height) {
                    if !known.contains_key(&child) && !result.contains(&child) {
                        next.insert(child, child_height);
                    }
                }

                if !known.contains_key(hash) && !result.contains(hash) {
                    result.insert(*hash);
                    // Soft cap: stop expanding, the level already visited
                    // stays in the response.
                    if result.len() > cap {
                        break 'level;
                    }
                }
            }

            frontier = next;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{chain, hash, index_all, make_service, GENESIS};

    #[test]
    fn test_walker_returns_forward_descendants() {
        let mut service = make_service();
        index_all(&mut service, chain(4));

        let result = service.blocks_from_last_known(&[hash(1)]);
        assert_eq!(result, HashSet::from([hash(2), hash(3)]));
    }

    #[test]
    fn test_walker_excludes_last_known_itself() {
        let mut service = make_service();
        index_all(&mut service, chain(3));

        let result = service.blocks_from_last_known(&[hash(1)]);
        assert!(!result.contains(&hash(1)));
        assert!(!result.contains(&GENESIS));
    }

    #[test]
    fn test_walker_merges_multiple_starting_points() {
        let mut service = make_service();
        index_all(&mut service, chain(5));

        let result = service.blocks_from_last_known(&[hash(1), hash(3)]);
        assert_eq!(result, HashSet::from([hash(2), hash(4)]));
    }

    #[test]
    fn test_walker_seeds_from_genesis_for_unknown_peer() {
        let mut service = make_service();
        index_all(&mut service, chain(3));

        let result = service.blocks_from_last_known(&[hash(0xEE)]);
        assert_eq!(result, HashSet::from([GENESIS, hash(1), hash(2)]));
    }

    #[test]
    fn test_walker_empty_when_even_genesis_is_missing() {
        let mut service = make_service();

        let result = service.blocks_from_last_known(&[hash(0xEE)]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_walker_empty_input_behaves_like_unknown_peer() {
        let mut service = make_service();
        index_all(&mut service, chain(2));

        let result = service.blocks_from_last_known(&[]);
        assert_eq!(result, HashSet::from([GENESIS, hash(1)]));
    }

    #[test]
    fn test_walker_cap_is_a_soft_bound() {
        let mut service = make_service_with_cap(3);
        index_all(&mut service, chain(20));

        let result = service.blocks_from_last_known(&[hash(5)]);
        // The cap stops expansion after it is exceeded; a linear chain adds
        // one block per level, so at most cap + 1 are returned.
        assert!(result.len() >= 3);
        assert!(result.len() <= 4);
        assert!(result.contains(&hash(6)));
    }

    #[test]
    fn test_walker_every_result_is_reachable() {
        let mut service = make_service();
        // Fork: two children of block 1, each with further descendants.
        let mut blocks = chain(3);
        blocks.push(crate::test_utils::block(10, 2, &[hash(1)]));
        blocks.push(crate::test_utils::block(11, 3, &[hash(10)]));
        index_all(&mut service, blocks);

        let result = service.blocks_from_last_known(&[hash(1)]);
        assert_eq!(result, HashSet::from([hash(2), hash(10), hash(11)]));
    }

    fn make_service_with_cap(
        cap: usize,
    ) -> crate::test_utils::TestService {
        crate::test_utils::make_service_with(
            crate::domain::value_objects::DagIndexConfig::new()
                .with_step(4)
                .with_max_blocks_inv(cap),
        )
    }
}
