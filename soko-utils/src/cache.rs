//! Small in-memory cache with a time-to-live and least-recently-used eviction.
//!
//! The cache is a plain owned value; callers hold it in their own context
//! rather than behind a global.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct CachedEntry<V> {
    value: V,
    cached_at: Instant,
}

pub struct TtlCache<V> {
    entries: LruCache<String, CachedEntry<V>>,
    ttl: Duration,
}

impl<V> TtlCache<V> {
    /// A cache holding at most `capacity` entries (minimum 1), each valid for `ttl`.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        TtlCache {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Look up a live entry, dropping it if it has expired.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let fresh = self.entries.peek(key)?.cached_at.elapsed() < self.ttl;
        if !fresh {
            self.entries.pop(key);
            return None;
        }
        self.entries.get(key).map(|e| &e.value)
    }

    /// Insert or replace an entry, evicting the least recently used one when full.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        if !self.entries.contains(&key) && self.entries.len() == self.entries.cap().get() {
            self.purge_expired();
        }
        let entry = CachedEntry {
            value,
            cached_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.entries.push(key.clone(), entry) {
            if evicted != key {
                log::debug!("cache: evicting {}", evicted);
            }
        }
    }

    pub fn invalidate(&mut self, key: &str) -> Option<V> {
        self.entries.pop(key).map(|e| e.value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, including ones that have expired but not yet been touched.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn purge_expired(&mut self) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.cached_at.elapsed() >= self.ttl)
            .map(|(k, _)| k.clone())
            .collect();
        for key in expired {
            self.entries.pop(&key);
        }
    }
}
