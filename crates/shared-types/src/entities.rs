//! # Core Chain Entities
//!
//! The block identifiers and block metadata exchanged between subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `BlockHash`, `BlockHeight`
//! - **Metadata**: `BlockInfo` (the block-store record the DAG index consumes)

use crate::errors::HashParseError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Height of a block: length of the longest parent chain from genesis.
pub type BlockHeight = u64;

/// A 32-byte block identifier.
///
/// Exchanged between subsystems (and serialized) as its lowercase hex
/// string, which makes it directly usable as a JSON object key. The raw
/// bytes are available for stores that persist binary keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockHash([u8; 32]);

impl BlockHash {
    /// The all-zero hash, used as the default genesis sentinel.
    pub const ZERO: BlockHash = BlockHash([0; 32]);

    /// Wrap raw hash bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        BlockHash(bytes)
    }

    /// The raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render as the canonical lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse the canonical lowercase hex form.
    ///
    /// Rejects wrong lengths and any character outside `[0-9a-f]`, including
    /// uppercase hex: a hash must have exactly one spelling.
    pub fn from_hex(input: &str) -> Result<Self, HashParseError> {
        if input.len() != 64 {
            return Err(HashParseError::InvalidLength { len: input.len() });
        }
        if let Some((position, character)) = input
            .chars()
            .enumerate()
            .find(|(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(HashParseError::InvalidCharacter {
                character,
                position,
            });
        }
        let mut bytes = [0u8; 32];
        // Length and alphabet are validated above, decode cannot fail.
        hex::decode_to_slice(input, &mut bytes)
            .map_err(|_| HashParseError::InvalidLength { len: input.len() })?;
        Ok(BlockHash(bytes))
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(bytes: [u8; 32]) -> Self {
        BlockHash(bytes)
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Leading 8 hex chars are enough to identify a block in logs.
        write!(f, "BlockHash({}..)", &self.to_hex()[..8])
    }
}

impl Serialize for BlockHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct BlockHashVisitor;

impl Visitor<'_> for BlockHashVisitor {
    type Value = BlockHash;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a 64-character lowercase hex string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<BlockHash, E> {
        BlockHash::from_hex(value).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(BlockHashVisitor)
    }
}

/// Block metadata persisted by the block store.
///
/// This is the record the DAG index consumes: identity, position in the DAG,
/// and the status flags the node tracks per block. Full block bodies are
/// stored elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    /// Hash of the block.
    pub hash: BlockHash,
    /// Height of the block (longest parent chain from genesis).
    pub height: BlockHeight,
    /// Hashes of all parent blocks. Multiple parents are the norm in a DAG.
    pub parent_hashes: Vec<BlockHash>,
    /// Block failed execution or validation and must not be built upon.
    pub is_bad: bool,
    /// Block has been finalized by consensus.
    pub is_final: bool,
    /// Concilium (validator group) that produced the block.
    pub concilium_id: u32,
}

impl BlockInfo {
    /// Create metadata for a well-formed block.
    pub fn new(
        hash: BlockHash,
        height: BlockHeight,
        parent_hashes: Vec<BlockHash>,
        concilium_id: u32,
    ) -> Self {
        Self {
            hash,
            height,
            parent_hashes,
            is_bad: false,
            is_final: false,
            concilium_id,
        }
    }

    /// Mark the block as failed. Bad blocks abort index reconstruction.
    pub fn mark_bad(&mut self) {
        self.is_bad = true;
    }

    /// Mark the block as finalized.
    pub fn mark_final(&mut self) {
        self.is_final = true;
    }
}
