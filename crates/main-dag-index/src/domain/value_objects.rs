//! # Value Objects
//!
//! Immutable configuration and key-construction types for the DAG index.

use sha2::{Digest, Sha256};
use shared_types::BlockHash;
use std::fmt;
use std::path::{Path, PathBuf};

/// Configuration for the Main DAG Index.
///
/// All values have production defaults; tests shrink `step` and
/// `pages_in_memory` to exercise paging and eviction with small DAGs.
#[derive(Debug, Clone)]
pub struct DagIndexConfig {
    /// Paging stride: one page covers `step` consecutive heights (default: 100).
    pub step: u64,

    /// Maximum pages held in memory by the cache (default: 10).
    pub pages_in_memory: usize,

    /// Cap on how many hashes one descendant enumeration may return
    /// (default: 500). A soft cap: the walk may finish the level in flight.
    pub max_blocks_inv: usize,

    /// Sentinel hash of the DAG root. Height 0 by definition.
    pub genesis_hash: BlockHash,

    /// Subdirectory of the node data path holding the index store
    /// (default: "main_dag_index").
    pub db_subdir: String,
}

impl Default for DagIndexConfig {
    fn default() -> Self {
        Self {
            step: 100,
            pages_in_memory: 10,
            max_blocks_inv: 500,
            genesis_hash: BlockHash::ZERO,
            db_subdir: "main_dag_index".to_string(),
        }
    }
}

impl DagIndexConfig {
    /// Create a configuration with production defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paging stride (clamped to >= 2; the page formula multiplies
    /// by `step - 1`).
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step.max(2);
        self
    }

    /// Set the cache capacity.
    pub fn with_pages_in_memory(mut self, pages: usize) -> Self {
        self.pages_in_memory = pages.max(1);
        self
    }

    /// Set the descendant enumeration cap.
    pub fn with_max_blocks_inv(mut self, cap: usize) -> Self {
        self.max_blocks_inv = cap;
        self
    }

    /// Set the genesis sentinel hash.
    pub fn with_genesis_hash(mut self, hash: BlockHash) -> Self {
        self.genesis_hash = hash;
        self
    }

    /// Set the index store subdirectory name.
    pub fn with_db_subdir(mut self, subdir: impl Into<String>) -> Self {
        self.db_subdir = subdir.into();
        self
    }

    /// Resolve the index store directory under the node data path.
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_subdir)
    }
}

/// Per-generation namespace prepended to every key the index writes.
///
/// A fresh prefix is drawn whenever an index generation starts (construction
/// or re-index), so a new generation can be built inside the same physical
/// store while the previous one is still readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagPrefix(String);

impl DagPrefix {
    /// Draw a new prefix: a 16-hex-char fragment of SHA-256 over the current
    /// time and process id.
    pub fn generate() -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        let mut hasher = Sha256::new();
        hasher.update(now.to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        let digest = hasher.finalize();

        DagPrefix(hex::encode(&digest[..8]))
    }

    /// Reconstruct a prefix from its string form (e.g. to read a previous
    /// generation).
    pub fn from_string(prefix: impl Into<String>) -> Self {
        DagPrefix(prefix.into())
    }

    /// The prefix string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the page record at `page_index`: `"<prefix>_<pageIndex>"`.
    pub fn page_key(&self, page_index: u64) -> Vec<u8> {
        format!("{}_{}", self.0, page_index).into_bytes()
    }

    /// Key of the order counter: `"<prefix>_order"`.
    pub fn order_key(&self) -> Vec<u8> {
        format!("{}_order", self.0).into_bytes()
    }
}

impl fmt::Display for DagPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
