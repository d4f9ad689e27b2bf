//! # Ports
//!
//! Port traits for the Main DAG Index (hexagonal architecture).
//!
//! - `inbound`: the APIs this crate exposes to the block processor and the
//!   peer-sync handler.
//! - `outbound`: the capabilities this crate requires the host to provide
//!   (key-value persistence, block metadata lookup).

pub mod inbound;
pub mod outbound;

pub use inbound::{DagIndexApi, DagWalkerApi};
pub use outbound::{
    BlockInfoStore, FaultyKVStore, InMemoryBlockInfoStore, InMemoryKVStore, KeyValueStore,
};
