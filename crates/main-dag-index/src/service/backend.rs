//! # Index Backend
//!
//! The two logical slices the index keeps in the KV store:
//!
//! - **pages**: `"<prefix>_<pageIndex>"` → JSON `PageRecord`
//! - **order**: `"<prefix>_order"` → UTF-8 decimal counter
//!
//! Every call holds the slice's named lock for its full duration. Read
//! failures (I/O or undecodable bytes) are downgraded to absence and
//! debug-logged; write failures propagate.

use crate::adapters::lock::KeyedMutex;
use crate::domain::errors::DagIndexError;
use crate::domain::page::{PageIndex, PageRecord};
use crate::domain::value_objects::DagPrefix;
use crate::ports::outbound::KeyValueStore;

/// Named lock serialising page reads and writes.
pub(crate) const PAGE_LOCK: &str = "dagIndexPage";
/// Named lock serialising order-counter reads and writes.
pub(crate) const ORDER_LOCK: &str = "dagIndexOrder";

/// Page and order-counter access over a `KeyValueStore`.
pub struct IndexBackend<KV: KeyValueStore> {
    kv: KV,
    locks: KeyedMutex,
}

impl<KV: KeyValueStore> IndexBackend<KV> {
    /// Wrap a KV store.
    pub fn new(kv: KV) -> Self {
        Self {
            kv,
            locks: KeyedMutex::new(),
        }
    }

    /// Direct access to the wrapped store. Test hook.
    pub(crate) fn kv_mut(&mut self) -> &mut KV {
        &mut self.kv
    }

    /// Read a page record. Absent, unreadable, or undecodable pages all
    /// answer `None`.
    pub fn get_page(&self, prefix: &DagPrefix, page_index: PageIndex) -> Option<PageRecord> {
        let _guard = self.locks.acquire(&[PAGE_LOCK]);

        let key = prefix.page_key(page_index);
        let bytes = match self.kv.get(&key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::debug!(
                    "[dag-index] page {} read failed, treating as absent: {}",
                    page_index,
                    e
                );
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!(
                    "[dag-index] page {} undecodable, treating as absent: {}",
                    page_index,
                    e
                );
                None
            }
        }
    }

    /// Write a page record.
    pub fn set_page(
        &mut self,
        prefix: &DagPrefix,
        page_index: PageIndex,
        record: &PageRecord,
    ) -> Result<(), DagIndexError> {
        let payload = serde_json::to_vec(record).map_err(|e| DagIndexError::Serialization {
            message: e.to_string(),
        })?;

        let _guard = self.locks.acquire(&[PAGE_LOCK]);
        self.kv
            .put(&prefix.page_key(page_index), &payload)
            .map_err(DagIndexError::from)
    }

    /// Read the order counter; 0 when absent or unreadable.
    pub fn get_order(&self, prefix: &DagPrefix) -> u64 {
        let _guard = self.locks.acquire(&[ORDER_LOCK]);
        self.read_order_locked(prefix)
    }

    /// Adjust the order counter by `delta`, saturating at zero.
    pub fn adjust_order(&mut self, prefix: &DagPrefix, delta: i64) -> Result<(), DagIndexError> {
        let _guard = self.locks.acquire(&[ORDER_LOCK]);

        let current = self.read_order_locked(prefix);
        let next = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };

        self.kv
            .put(&prefix.order_key(), next.to_string().as_bytes())
            .map_err(DagIndexError::from)
    }

    /// Counter read shared by `get_order` and `adjust_order`. The caller
    /// already holds the order lock.
    fn read_order_locked(&self, prefix: &DagPrefix) -> u64 {
        let bytes = match self.kv.get(&prefix.order_key()) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return 0,
            Err(e) => {
                tracing::debug!(
                    "[dag-index] order counter read failed, treating as 0: {}",
                    e
                );
                return 0;
            }
        };

        match std::str::from_utf8(&bytes).ok().and_then(|s| s.parse().ok()) {
            Some(value) => value,
            None => {
                tracing::debug!("[dag-index] order counter undecodable, treating as 0");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::page::PageEntry;
    use crate::ports::outbound::{FaultyKVStore, InMemoryKVStore};
    use shared_types::BlockHash;

    fn prefix() -> DagPrefix {
        DagPrefix::from_string("test")
    }

    #[test]
    fn test_page_round_trip() {
        let mut backend = IndexBackend::new(InMemoryKVStore::new());
        let mut page = PageRecord::new();
        page.insert(BlockHash::new([1; 32]), PageEntry::vertex());

        assert!(backend.get_page(&prefix(), 0).is_none());
        backend.set_page(&prefix(), 0, &page).unwrap();
        assert_eq!(backend.get_page(&prefix(), 0).unwrap(), page);
    }

    #[test]
    fn test_pages_are_namespaced_by_prefix() {
        let mut backend = IndexBackend::new(InMemoryKVStore::new());
        let page = PageRecord::new();

        backend.set_page(&prefix(), 0, &page).unwrap();
        assert!(backend
            .get_page(&DagPrefix::from_string("other"), 0)
            .is_none());
    }

    #[test]
    fn test_read_failures_downgrade_to_absent() {
        let mut kv = FaultyKVStore::new();
        kv.set_fail_reads(true);
        let backend = IndexBackend::new(kv);

        assert!(backend.get_page(&prefix(), 0).is_none());
        assert_eq!(backend.get_order(&prefix()), 0);
    }

    #[test]
    fn test_corrupt_page_downgrades_to_absent() {
        let mut kv = InMemoryKVStore::new();
        kv.put(&prefix().page_key(0), b"not json").unwrap();
        let backend = IndexBackend::new(kv);

        assert!(backend.get_page(&prefix(), 0).is_none());
    }

    #[test]
    fn test_write_failures_propagate() {
        let mut kv = FaultyKVStore::new();
        kv.set_fail_writes(true);
        let mut backend = IndexBackend::new(kv);

        let result = backend.set_page(&prefix(), 0, &PageRecord::new());
        assert!(matches!(result, Err(DagIndexError::Storage { .. })));

        let result = backend.adjust_order(&prefix(), 1);
        assert!(matches!(result, Err(DagIndexError::Storage { .. })));
    }

    #[test]
    fn test_order_counter_adjustments() {
        let mut backend = IndexBackend::new(InMemoryKVStore::new());

        assert_eq!(backend.get_order(&prefix()), 0);
        backend.adjust_order(&prefix(), 1).unwrap();
        backend.adjust_order(&prefix(), 1).unwrap();
        assert_eq!(backend.get_order(&prefix()), 2);

        backend.adjust_order(&prefix(), -1).unwrap();
        assert_eq!(backend.get_order(&prefix()), 1);

        // Saturates rather than wrapping below zero.
        backend.adjust_order(&prefix(), -1).unwrap();
        backend.adjust_order(&prefix(), -1).unwrap();
        assert_eq!(backend.get_order(&prefix()), 0);
    }

    #[test]
    fn test_order_is_persisted_as_decimal_text() {
        let mut backend = IndexBackend::new(InMemoryKVStore::new());
        backend.adjust_order(&prefix(), 1).unwrap();
        backend.adjust_order(&prefix(), 1).unwrap();

        let raw = backend.kv.get(&prefix().order_key()).unwrap().unwrap();
        assert_eq!(raw, b"2".to_vec());
    }
}
