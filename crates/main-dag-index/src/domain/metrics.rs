//! # Index Metrics
//!
//! Lightweight operation counters for monitoring. The `missing_parents`
//! counter is the tell for store corruption: a handful during a reorg is
//! normal, a steadily climbing value is not.

/// Operation counters collected by the index service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagIndexMetrics {
    /// Blocks indexed as true vertices.
    pub blocks_indexed: u64,
    /// Blocks removed from the index.
    pub blocks_removed: u64,
    /// Parent edges skipped because the block store had no record.
    pub missing_parents: u64,
}

impl DagIndexMetrics {
    /// Fresh counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly indexed vertex.
    pub fn on_block_indexed(&mut self) {
        self.blocks_indexed += 1;
    }

    /// Record a removed vertex.
    pub fn on_block_removed(&mut self) {
        self.blocks_removed += 1;
    }

    /// Record a parent edge skipped for lack of a block record.
    pub fn on_missing_parent(&mut self) {
        self.missing_parents += 1;
    }

    /// Snapshot the counters.
    pub fn snapshot(&self) -> DagIndexMetrics {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut metrics = DagIndexMetrics::new();
        metrics.on_block_indexed();
        metrics.on_block_indexed();
        metrics.on_block_removed();
        metrics.on_missing_parent();

        let snap = metrics.snapshot();
        assert_eq!(snap.blocks_indexed, 2);
        assert_eq!(snap.blocks_removed, 1);
        assert_eq!(snap.missing_parents, 1);
    }
}
