//! Last-known-good entries keyed by market.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::domain::{CacheKey, Entry};

/// Thread-safe map from [`CacheKey`] to the last successfully built entry.
///
/// Loaded once from the store at the start of a build. Workers only insert
/// under their own key and hold the lock for the map update alone.
#[derive(Debug, Default)]
pub struct RegistryCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl RegistryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index persisted entries by their cache key. Later duplicates win.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.cache_key(), entry))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Entry> {
        self.entries.lock().get(key).cloned()
    }

    /// The cached entry for `key` if it can be served without refetching.
    #[must_use]
    pub fn usable(&self, key: &CacheKey) -> Option<Entry> {
        self.entries
            .lock()
            .get(key)
            .filter(|entry| entry.is_usable())
            .cloned()
    }

    pub fn insert(&self, key: CacheKey, entry: Entry) {
        self.entries.lock().insert(key, entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
