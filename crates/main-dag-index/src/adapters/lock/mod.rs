//! # Named Locks
//!
//! A keyed mutex serialising access to the index's storage namespaces.
//!
//! ## Modules
//!
//! - `keyed`: the `KeyedMutex` implementation and its RAII guard

mod keyed;

pub use keyed::{KeyedMutex, KeyedMutexGuard};
