//! Process-local cache with per-entry expiry.
//!
//! Catalog queries are slow (full CSV downloads) and their results change rarely,
//! so they are cached by argument key for a bounded time window. The cache is an
//! explicit key → (value, expiry) map rather than ambient memoization, so the
//! expiry behavior is testable on its own.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn fresh(value: V, ttl: Duration) -> Self {
        CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// A single-writer map from key to value where every entry expires `ttl` after insertion.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    ttl: Duration,
    entries: HashMap<K, CacheEntry<V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a live entry, evicting it first if it has expired.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.get(key).is_some_and(|e| e.is_expired()) {
            self.entries.remove(key);
        }
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries
            .insert(key, CacheEntry::fresh(value, self.ttl));
    }

    /// Return the cached value for `key`, or compute, store, and return it.
    ///
    /// The initializer runs only when the entry is absent or expired. If it fails,
    /// nothing is stored and a later call will retry it.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: K, init: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        match self.entries.entry(key) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_expired() {
                    match init() {
                        Ok(value) => {
                            occupied.insert(CacheEntry::fresh(value, self.ttl));
                        }
                        Err(err) => {
                            // Evict the stale entry so a failed refresh leaves
                            // no trace in the map.
                            occupied.remove();
                            return Err(err);
                        }
                    }
                }
                Ok(&occupied.into_mut().value)
            }
            Entry::Vacant(vacant) => {
                let entry = vacant.insert(CacheEntry::fresh(init()?, self.ttl));
                Ok(&entry.value)
            }
        }
    }

    /// Drop every expired entry.
    pub fn purge_expired(&mut self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
