//! # Shared Type Errors
//!
//! Parse-boundary errors for the shared entity types.

use std::fmt;

/// Rejection of a malformed block-hash string.
///
/// A block hash has exactly one textual form: 64 lowercase hex characters.
/// Anything else is rejected at the boundary so a malformed peer input can
/// never reach the index or the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashParseError {
    /// Input length is not 64 characters.
    InvalidLength { len: usize },

    /// Input contains a character outside `[0-9a-f]`.
    ///
    /// Uppercase hex is deliberately rejected: accepting a second spelling of
    /// the same hash would let the same block occupy two index rows.
    InvalidCharacter { character: char, position: usize },
}

impl fmt::Display for HashParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashParseError::InvalidLength { len } => {
                write!(f, "Invalid hash length: {} characters (expected 64)", len)
            }
            HashParseError::InvalidCharacter {
                character,
                position,
            } => {
                write!(
                    f,
                    "Invalid hash character {:?} at position {} (expected lowercase hex)",
                    character, position
                )
            }
        }
    }
}

impl std::error::Error for HashParseError {}
