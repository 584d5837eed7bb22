//! In-memory TTL cache of normalized items, keyed by source URL.
//!
//! Entries expire by age only; there is no size bound. Writes are
//! last-write-wins, so two overlapping fetches of one URL both land and the
//! later one sticks.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use bidwatch_common::Item;
use tokio::time::Instant;

struct CacheEntry {
    item: Item,
    cached_at: Instant,
}

pub struct ItemCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ItemCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached item for `url` if it is younger than the TTL.
    pub fn get(&self, url: &str) -> Option<Item> {
        let entries = self.entries.read().expect("item cache lock poisoned");
        entries
            .get(url)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.item.clone())
    }

    pub fn insert(&self, url: &str, item: Item) {
        self.entries
            .write()
            .expect("item cache lock poisoned")
            .insert(
                url.to_string(),
                CacheEntry {
                    item,
                    cached_at: Instant::now(),
                },
            );
    }

    /// Drop one URL, or everything when `url` is `None`. Returns entries removed.
    pub fn clear(&self, url: Option<&str>) -> usize {
        let mut entries = self.entries.write().expect("item cache lock poisoned");
        match url {
            Some(url) => usize::from(entries.remove(url).is_some()),
            None => {
                let n = entries.len();
                entries.clear();
                n
            }
        }
    }

    /// Delete expired entries. Returns how many were removed.
    pub fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write().expect("item cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.cached_at.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("item cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
