//! # Shared Types Crate
//!
//! Cross-subsystem entities for the DAG ledger node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type exchanged between subsystems
//!   (block hashes, heights, block metadata) is defined here.
//! - **Canonical Encoding**: a `BlockHash` has exactly one textual form, its
//!   lowercase hex string. Parsing rejects everything else.
//! - **No Behaviour**: this crate carries data definitions only; subsystem
//!   logic lives in the subsystem crates.

pub mod entities;
pub mod errors;

pub use entities::{BlockHash, BlockHeight, BlockInfo};
pub use errors::HashParseError;
