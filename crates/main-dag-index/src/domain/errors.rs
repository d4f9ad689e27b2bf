//! # Domain Errors
//!
//! Error types for the Main DAG Index subsystem.
//!
//! ## Propagation Policy
//!
//! - KV **reads** that fail are downgraded to "absent" at the backend and
//!   debug-logged; they never surface here.
//! - KV **writes** that fail propagate as `Storage`.
//! - Reconstruction aborts on structurally impossible state (a frontier hash
//!   with no block record, or a bad block).

use shared_types::{BlockHash, HashParseError};
use std::fmt;

/// Errors that can occur during DAG index operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagIndexError {
    /// The KV backend rejected a write.
    Storage { message: String },

    /// A page record could not be encoded for persistence.
    Serialization { message: String },

    /// Reconstruction reached a hash the block store has no record for.
    RebuildMissingBlock { hash: BlockHash },

    /// Reconstruction reached a block marked bad.
    RebuildBadBlock { hash: BlockHash },

    /// A caller passed a malformed block hash.
    InvalidHash { message: String },
}

impl fmt::Display for DagIndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DagIndexError::Storage { message } => {
                write!(f, "Index storage error: {}", message)
            }
            DagIndexError::Serialization { message } => {
                write!(f, "Page serialization error: {}", message)
            }
            DagIndexError::RebuildMissingBlock { hash } => {
                write!(f, "Rebuild aborted: no block record for {}", hash)
            }
            DagIndexError::RebuildBadBlock { hash } => {
                write!(f, "Rebuild aborted: block {} is marked bad", hash)
            }
            DagIndexError::InvalidHash { message } => {
                write!(f, "Invalid block hash: {}", message)
            }
        }
    }
}

impl std::error::Error for DagIndexError {}

impl From<KVStoreError> for DagIndexError {
    fn from(err: KVStoreError) -> Self {
        DagIndexError::Storage {
            message: err.to_string(),
        }
    }
}

impl From<HashParseError> for DagIndexError {
    fn from(err: HashParseError) -> Self {
        DagIndexError::InvalidHash {
            message: err.to_string(),
        }
    }
}

/// Key-value store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KVStoreError {
    /// I/O error during read/write.
    IOError { message: String },
    /// Data corruption in the store.
    CorruptionError { message: String },
}

impl fmt::Display for KVStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KVStoreError::IOError { message } => write!(f, "KV store I/O error: {}", message),
            KVStoreError::CorruptionError { message } => {
                write!(f, "KV store corruption: {}", message)
            }
        }
    }
}

impl std::error::Error for KVStoreError {}
