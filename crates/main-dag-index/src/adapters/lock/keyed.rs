//! # Keyed Mutex
//!
//! A mutex over named slots. `acquire` blocks until every requested name is
//! free, then holds them all; the guard frees them on drop, on every path.
//!
//! Non-reentrant: a caller acquiring a name it already holds deadlocks.
//! Callers therefore take exactly one index lock per storage call and never
//! nest acquisitions.

use parking_lot::{Condvar, Mutex};
use std::collections::HashSet;

/// Mutex over named slots.
pub struct KeyedMutex {
    held: Mutex<HashSet<String>>,
    freed: Condvar,
}

impl KeyedMutex {
    /// Create a keyed mutex with no slots held.
    pub fn new() -> Self {
        Self {
            held: Mutex::new(HashSet::new()),
            freed: Condvar::new(),
        }
    }

    /// Block until every name in `names` is free, then hold them all.
    ///
    /// All-or-nothing: either every requested slot is marked held in one
    /// step, or the caller keeps waiting. A partial hold never exists.
    pub fn acquire(&self, names: &[&str]) -> KeyedMutexGuard<'_> {
        let mut held = self.held.lock();
        while names.iter().any(|name| held.contains(*name)) {
            self.freed.wait(&mut held);
        }
        for name in names {
            held.insert((*name).to_string());
        }
        KeyedMutexGuard {
            owner: self,
            names: names.iter().map(|name| (*name).to_string()).collect(),
        }
    }

    /// Whether a slot is currently held. Test hook.
    pub fn is_held(&self, name: &str) -> bool {
        self.held.lock().contains(name)
    }
}

impl Default for KeyedMutex {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds named slots until dropped.
pub struct KeyedMutexGuard<'a> {
    owner: &'a KeyedMutex,
    names: Vec<String>,
}

impl Drop for KeyedMutexGuard<'_> {
    fn drop(&mut self) {
        let mut held = self.owner.held.lock();
        for name in &self.names {
            held.remove(name);
        }
        self.owner.freed.notify_all();
    }
}
