//! Shared LRU page cache.
//!
//! Storage wrappers sit behind one `PageCache` instance and key it by a
//! fingerprint of the page identity. The cache is best-effort by contract:
//! a contended or poisoned lock degrades to a miss (or a skipped insert)
//! instead of blocking or failing the read path.

use std::collections::BTreeMap;
use std::sync::RwLock;

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Computes the FNV-1a fingerprint of a page identity.
pub fn fingerprint(bytes: &[u8]) -> u64 {
    let mut state = FNV_OFFSET;
    for byte in bytes {
        state ^= *byte as u64;
        state = state.wrapping_mul(FNV_PRIME);
    }
    state
}

struct CacheEntry<V> {
    page: V,
    last_access: u64,
}

struct CacheState<V> {
    entries: BTreeMap<u64, CacheEntry<V>>,
    access_counter: u64,
    hits: u64,
    misses: u64,
}

impl<V> CacheState<V> {
    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(&key, _)| key);
        if let Some(key) = victim {
            self.entries.remove(&key);
        }
    }
}

/// A bounded cache of pages with least-recently-used eviction.
///
/// Capacity is counted in entries. Statistics only track lookups that
/// reached the recency-tracking path.
pub struct PageCache<V> {
    max_size: usize,
    state: RwLock<CacheState<V>>,
}

impl<V: Clone> PageCache<V> {
    /// Creates a cache holding at most `max_size` pages.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            state: RwLock::new(CacheState {
                entries: BTreeMap::new(),
                access_counter: 0,
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Looks up a page, bumping its recency on a hit.
    ///
    /// When the write lock is contended the lookup falls back to a plain
    /// read without touching recency; a poisoned lock reads as a miss.
    pub fn get(&self, fingerprint: u64) -> Option<V> {
        if let Ok(mut state) = self.state.try_write() {
            state.access_counter += 1;
            let counter = state.access_counter;
            if let Some(entry) = state.entries.get_mut(&fingerprint) {
                entry.last_access = counter;
                let page = entry.page.clone();
                state.hits += 1;
                return Some(page);
            }
            state.misses += 1;
            return None;
        }
        match self.state.try_read() {
            Ok(state) => state.entries.get(&fingerprint).map(|entry| entry.page.clone()),
            Err(_) => None,
        }
    }

    /// Inserts a page, evicting the least recently used entry when full.
    ///
    /// A contended or poisoned lock skips the insert; the caller already
    /// holds the page.
    pub fn insert(&self, fingerprint: u64, page: V) {
        if let Ok(mut state) = self.state.try_write() {
            if !state.entries.contains_key(&fingerprint) && state.entries.len() >= self.max_size
            {
                state.evict_lru();
            }
            state.access_counter += 1;
            let counter = state.access_counter;
            state.entries.insert(
                fingerprint,
                CacheEntry {
                    page,
                    last_access: counter,
                },
            );
        }
    }

    /// Looks up a page, computing and caching it on a miss.
    pub fn get_or_insert_with<F: FnOnce() -> V>(&self, fingerprint: u64, build: F) -> V {
        if let Some(page) = self.get(fingerprint) {
            return page;
        }
        let page = build();
        self.insert(fingerprint, page.clone());
        page
    }

    /// Removes every entry. Statistics are kept.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.try_write() {
            state.entries.clear();
        }
    }

    /// Returns the number of cached pages.
    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.entries.len()).unwrap_or(0)
    }

    /// Returns true if the cache holds no pages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of recency-tracked lookups that hit.
    pub fn hits(&self) -> u64 {
        self.state.read().map(|state| state.hits).unwrap_or(0)
    }

    /// Returns the number of recency-tracked lookups that missed.
    pub fn misses(&self) -> u64 {
        self.state.read().map(|state| state.misses).unwrap_or(0)
    }

    /// Returns the hit rate over recency-tracked lookups, or 0.0 before the
    /// first lookup.
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = (self.hits(), self.misses());
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}
