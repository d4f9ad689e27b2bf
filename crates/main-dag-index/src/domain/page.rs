//! # Page Records
//!
//! The on-disk unit of the DAG index: a page maps block hashes within one
//! height bucket to their entry (vertex flag + direct children).
//!
//! ## Wire Shape
//!
//! A page serializes to JSON as an object keyed by hex hashes; each entry is
//! the two-element array `[processed, children]`:
//!
//! ```text
//! { "<blockHashHex>": [ true, { "<childHashHex>": <childHeight>, ... } ], ... }
//! ```

use serde::de::Deserializer;
use serde::ser::{SerializeTuple, Serializer};
use serde::{Deserialize, Serialize};
use shared_types::{BlockHash, BlockHeight};
use std::collections::HashMap;

/// Identifier of one height bucket; part of the persisted page key.
pub type PageIndex = u64;

/// Map a block height to the index of the page holding it.
///
/// The multiplier is `step - 1`, not `step`: bucket boundaries are offset by
/// one relative to the obvious scheme. This exact formula is embedded in the
/// page keys of every deployed database and must not be changed.
pub fn page_index_for_height(height: BlockHeight, step: u64) -> PageIndex {
    (height / step) * (step - 1)
}

/// One row of a page.
///
/// `processed` distinguishes true vertices (blocks added by `add_block`) from
/// placeholder rows that exist only because a child referenced the hash as a
/// parent. `children` holds direct descendants only: blocks exactly one
/// height above this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// The block itself has been indexed, not merely referenced.
    pub processed: bool,
    /// Direct children: hash of each block at `height + 1` naming this block
    /// as a parent, mapped to that child's height.
    pub children: HashMap<BlockHash, BlockHeight>,
}

impl PageEntry {
    /// Row for a block that was indexed itself.
    pub fn vertex() -> Self {
        Self {
            processed: true,
            children: HashMap::new(),
        }
    }

    /// Back-pointer row for a parent known only through one of its children.
    pub fn placeholder(child: BlockHash, child_height: BlockHeight) -> Self {
        let mut children = HashMap::new();
        children.insert(child, child_height);
        Self {
            processed: false,
            children,
        }
    }
}

impl Serialize for PageEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.processed)?;
        tuple.serialize_element(&self.children)?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for PageEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Fixed-arity tuple: anything but exactly two elements is rejected.
        let (processed, children) =
            <(bool, HashMap<BlockHash, BlockHeight>)>::deserialize(deserializer)?;
        Ok(Self {
            processed,
            children,
        })
    }
}

/// One persisted page: every indexed row in a height bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRecord {
    entries: HashMap<BlockHash, PageEntry>,
}

impl PageRecord {
    /// An empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a row.
    pub fn get(&self, hash: &BlockHash) -> Option<&PageEntry> {
        self.entries.get(hash)
    }

    /// Look up a row for mutation.
    pub fn get_mut(&mut self, hash: &BlockHash) -> Option<&mut PageEntry> {
        self.entries.get_mut(hash)
    }

    /// Insert or replace a row.
    pub fn insert(&mut self, hash: BlockHash, entry: PageEntry) -> Option<PageEntry> {
        self.entries.insert(hash, entry)
    }

    /// Delete a row.
    pub fn remove(&mut self, hash: &BlockHash) -> Option<PageEntry> {
        self.entries.remove(hash)
    }

    /// Whether the page holds a row for `hash`.
    pub fn contains(&self, hash: &BlockHash) -> bool {
        self.entries.contains_key(hash)
    }

    /// Number of rows (both vertices and placeholders).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the page has no rows left.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all rows.
    pub fn iter(&self) -> impl Iterator<Item = (&BlockHash, &PageEntry)> {
        self.entries.iter()
    }
}
