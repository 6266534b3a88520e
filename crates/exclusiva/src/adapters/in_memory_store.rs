// Rust guideline compliant 2026-10-16

//! In-memory adapter for the `KeyValueStore` port.
//!
//! Models browser-style local storage: a flat string map with an optional
//! byte quota. Returns `StoreError::QuotaExceeded` when a write would push the
//! stored keys and values past the quota; the previous value is kept.

use std::cell::RefCell;
use std::collections::HashMap;

use domain::{KeyValueStore, StoreError};

/// `KeyValueStore` adapter backed by a `HashMap<String, String>`.
#[derive(Debug)]
pub struct InMemoryStore {
    docs: RefCell<HashMap<String, String>>,
    /// Maximum total bytes of keys plus values; `None` for no limit.
    quota: Option<usize>,
}

impl InMemoryStore {
    /// Create an empty store with an optional byte `quota`.
    #[must_use]
    pub fn new(quota: Option<usize>) -> Self {
        Self { docs: RefCell::new(HashMap::new()), quota }
    }

    /// Total bytes of keys and values currently held, excluding `skip`.
    fn used_bytes(&self, skip: &str) -> usize {
        self.docs
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != skip)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for InMemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QuotaExceeded` when the write would exceed the
    /// configured quota.
    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        if let Some(limit) = self.quota
            && self.used_bytes(key) + key.len() + value.len() > limit
        {
            tracing::warn!("memory.save.quota_exceeded: key={key} limit={limit}");
            return Err(StoreError::QuotaExceeded { limit });
        }
        self.docs.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
