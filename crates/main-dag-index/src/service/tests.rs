//! # DAG Index Service Tests

use super::*;
use crate::domain::errors::DagIndexError;
use crate::ports::inbound::DagIndexApi;
use crate::ports::outbound::{BlockInfoStore, FaultyKVStore, InMemoryBlockInfoStore};
use crate::test_utils::{block, chain, hash, index_all, make_service, make_service_with, GENESIS};

#[test]
fn test_add_block_indexes_vertex_and_parent_edge() {
    let mut service = make_service();
    index_all(&mut service, chain(3));

    assert!(service.has(&GENESIS, Some(0)));
    assert!(service.has(&hash(1), Some(1)));
    assert!(service.has(&hash(2), Some(2)));

    let children = service.get_children(&hash(1), 1);
    assert_eq!(children.len(), 1);
    assert_eq!(children.get(&hash(2)), Some(&2));
}

#[test]
fn test_add_block_is_idempotent() {
    let mut service = make_service();
    index_all(&mut service, chain(3));
    let order = service.get_order();
    let children = service.get_children(&hash(1), 1);

    let info = service.block_store.get_block_info(&hash(2)).unwrap();
    for _ in 0..3 {
        service.add_block(&info).unwrap();
    }

    assert_eq!(service.get_order(), order);
    assert_eq!(service.get_children(&hash(1), 1), children);
}

#[test]
fn test_order_counts_placeholders_and_vertices() {
    let mut service = make_service();
    // Index only block 1: its own vertex row plus the genesis placeholder.
    let blocks = chain(2);
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    service.add_block(&blocks[1]).unwrap();

    assert_eq!(service.get_order(), 2);
    // Genesis is a placeholder, not a processed vertex.
    assert!(!service.has(&GENESIS, Some(0)));

    // Promoting the placeholder does not re-count it.
    service.add_block(&blocks[0]).unwrap();
    assert_eq!(service.get_order(), 2);
    assert!(service.has(&GENESIS, Some(0)));
}

#[test]
fn test_promotion_keeps_children() {
    let mut service = make_service();
    let blocks = chain(2);
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    // Child first: genesis becomes a placeholder holding the child edge.
    service.add_block(&blocks[1]).unwrap();
    service.add_block(&blocks[0]).unwrap();

    let children = service.get_children(&GENESIS, 0);
    assert_eq!(children.get(&hash(1)), Some(&1));
}

#[test]
fn test_gap_parents_get_no_child_entry() {
    let mut service = make_service();
    // X at height 3 referencing G (gap 3) and A at height 1 (gap 2).
    let blocks = vec![
        block(0, 0, &[]),
        block(1, 1, &[GENESIS]),
        block(7, 3, &[GENESIS, hash(1)]),
    ];
    index_all(&mut service, blocks);

    let genesis_children = service.get_children(&GENESIS, 0);
    assert_eq!(genesis_children.len(), 1);
    assert!(genesis_children.contains_key(&hash(1)));

    assert!(service.get_children(&hash(1), 1).is_empty());
    // X is still a processed vertex on its own page.
    assert!(service.has(&hash(7), Some(3)));
}

#[test]
fn test_missing_parent_edge_is_skipped_and_counted() {
    let mut service = make_service();
    let orphan = block(5, 5, &[hash(4)]);
    service.block_store.save_block_info(orphan.clone());

    service.add_block(&orphan).unwrap();

    assert!(service.has(&hash(5), Some(5)));
    // Only the vertex row exists; the unresolvable parent left no trace.
    assert_eq!(service.get_order(), 1);
    assert_eq!(service.metrics().missing_parents, 1);
}

#[test]
fn test_remove_block_restores_parent_bookkeeping() {
    let mut service = make_service();
    index_all(&mut service, chain(4));
    assert_eq!(service.get_order(), 4);

    let info = service.block_store.get_block_info(&hash(3)).unwrap();
    service.remove_block(&info).unwrap();

    assert_eq!(service.get_order(), 3);
    assert!(service.get_children(&hash(2), 2).is_empty());
    assert!(!service.has(&hash(3), Some(3)));
    // The parent itself is still a processed vertex.
    assert!(service.has(&hash(2), Some(2)));
}

#[test]
fn test_remove_block_prunes_emptied_placeholder() {
    let mut service = make_service();
    let blocks = chain(2);
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    // Genesis exists only as a placeholder under block 1.
    service.add_block(&blocks[1]).unwrap();
    assert_eq!(service.get_order(), 2);

    service.remove_block(&blocks[1]).unwrap();

    // Both the vertex row and the emptied placeholder are gone.
    assert_eq!(service.get_order(), 0);
    assert!(!service.has(&hash(1), Some(1)));
    assert!(service.get_children(&GENESIS, 0).is_empty());
}

#[test]
fn test_remove_block_is_a_noop_for_unknown_blocks() {
    let mut service = make_service();
    index_all(&mut service, chain(2));
    let order = service.get_order();

    service.remove_block(&block(9, 9, &[hash(8)])).unwrap();
    assert_eq!(service.get_order(), order);
}

#[test]
fn test_fork_children_are_both_indexed() {
    let mut service = make_service();
    let blocks = vec![
        block(0, 0, &[]),
        block(1, 1, &[GENESIS]),
        block(2, 2, &[hash(1)]),
        block(3, 2, &[hash(1)]),
    ];
    index_all(&mut service, blocks);

    let children = service.get_children(&hash(1), 1);
    assert_eq!(children.len(), 2);
    assert_eq!(children.get(&hash(2)), Some(&2));
    assert_eq!(children.get(&hash(3)), Some(&2));
}

#[test]
fn test_has_resolves_height_through_block_store() {
    let mut service = make_service();
    index_all(&mut service, chain(2));

    assert!(service.has(&hash(1), None));
    assert!(!service.has(&hash(9), None));
}

#[test]
fn test_get_block_height_and_info_require_processed() {
    let mut service = make_service();
    let blocks = chain(2);
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    service.add_block(&blocks[1]).unwrap();

    assert_eq!(service.get_block_height(&hash(1)), Some(1));
    assert_eq!(service.get_block_info(&hash(1)).unwrap().height, 1);

    // Genesis is in the block store but only a placeholder in the index.
    assert_eq!(service.get_block_height(&GENESIS), None);
    assert!(service.get_block_info(&GENESIS).is_none());

    // Unknown everywhere.
    assert_eq!(service.get_block_height(&hash(9)), None);
}

#[test]
fn test_children_of_placeholder_are_hidden() {
    let mut service = make_service();
    let blocks = chain(2);
    for info in &blocks {
        service.block_store.save_block_info(info.clone());
    }
    service.add_block(&blocks[1]).unwrap();

    // The placeholder row holds the edge but is not a processed vertex.
    assert!(service.get_children(&GENESIS, 0).is_empty());
}

#[test]
fn test_blocks_spanning_pages() {
    // step = 4: heights 0..3 on page 0, heights 4..7 on page 3.
    let mut service = make_service();
    index_all(&mut service, chain(8));

    assert_eq!(service.get_order(), 8);
    for i in 1..8u8 {
        assert!(service.has(&hash(i), Some(i as u64)));
        let children = service.get_children(&hash(i - 1), (i - 1) as u64);
        assert_eq!(children.get(&hash(i)), Some(&(i as u64)));
    }
}

#[test]
fn test_cache_eviction_loses_no_data() {
    let config = crate::domain::value_objects::DagIndexConfig::new()
        .with_step(4)
        .with_pages_in_memory(2);
    let mut service = make_service_with(config);

    // Three touched page ranges with a two-page cache.
    index_all(&mut service, chain(12));

    let stats = service.cache_stats();
    assert!(stats.entries <= 2);
    assert!(stats.misses > 0);

    // Every block is still reachable after evictions.
    for i in 0..12u8 {
        assert!(service.has(&hash(i), Some(i as u64)));
    }
}

#[test]
fn test_read_failures_answer_conservatively() {
    let deps = DagIndexDependencies {
        kv_store: FaultyKVStore::new(),
        block_store: InMemoryBlockInfoStore::new(),
    };
    let config = crate::domain::value_objects::DagIndexConfig::new().with_step(4);
    let mut service = DagIndexService::new(deps, config);
    index_all_faulty(&mut service);

    service.backend.kv_mut().set_fail_reads(true);
    service.cache.clear();

    assert!(!service.has(&hash(1), Some(1)));
    assert!(service.get_children(&GENESIS, 0).is_empty());
    assert_eq!(service.get_order(), 0);
}

#[test]
fn test_write_failures_propagate() {
    let deps = DagIndexDependencies {
        kv_store: FaultyKVStore::new(),
        block_store: InMemoryBlockInfoStore::new(),
    };
    let config = crate::domain::value_objects::DagIndexConfig::new().with_step(4);
    let mut service = DagIndexService::new(deps, config);

    let genesis = block(0, 0, &[]);
    service.block_store.save_block_info(genesis.clone());
    service.backend.kv_mut().set_fail_writes(true);

    let result = service.add_block(&genesis);
    assert!(matches!(result, Err(DagIndexError::Storage { .. })));
}

#[test]
fn test_drop_all_for_reindex_isolates_generations() {
    let mut service = make_service();
    index_all(&mut service, chain(3));
    assert_eq!(service.get_order(), 3);
    let old_prefix = service.prefix().clone();

    service.drop_all_for_reindex();

    assert_ne!(service.prefix(), &old_prefix);
    assert_eq!(service.get_order(), 0);
    assert!(!service.has(&hash(1), Some(1)));
    assert!(service.cache_stats().entries == 0);

    // The new generation indexes independently of the retired keys.
    index_all(&mut service, chain(2));
    assert_eq!(service.get_order(), 2);
}

#[test]
fn test_metrics_track_operations() {
    let mut service = make_service();
    index_all(&mut service, chain(3));

    let info = service.block_store.get_block_info(&hash(2)).unwrap();
    service.remove_block(&info).unwrap();

    let metrics = service.metrics();
    assert_eq!(metrics.blocks_indexed, 3);
    assert_eq!(metrics.blocks_removed, 1);
    assert_eq!(metrics.missing_parents, 0);
}

/// Index a two-block chain into a service running on a `FaultyKVStore`.
fn index_all_faulty(service: &mut DagIndexService<FaultyKVStore, InMemoryBlockInfoStore>) {
    for info in chain(2) {
        service.block_store.save_block_info(info.clone());
        service.add_block(&info).unwrap();
    }
}
