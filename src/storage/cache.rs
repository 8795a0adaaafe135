//! Bounded, expiring lookup cache.
//!
//! Least-recently-used eviction with a write-time expiration window. The
//! cache is never a source of truth: an expired or missing entry is simply a
//! miss and callers fall through to the store.

use crate::{Error, Result};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Entry in the cache.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// Cached value.
    value: V,
    /// When the value was written.
    stored_at: Instant,
}

/// Thread-safe LRU cache whose entries expire a fixed time after being written.
///
/// # Lock Poisoning
///
/// A poisoned lock is recovered rather than skipped, so an invalidation is
/// never lost because another thread panicked.
pub struct ExpiringCache<K, V> {
    /// Label used in metrics and logs.
    name: &'static str,
    /// LRU map of entries.
    entries: RwLock<LruCache<K, CacheEntry<V>>>,
    /// Time-to-live measured from the write.
    ttl: Duration,
}

impl<K, V> std::fmt::Debug for ExpiringCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("name", &self.name)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone + std::fmt::Debug, V: Clone> ExpiringCache<K, V> {
    /// Creates a cache holding at most `capacity` entries for `ttl` each.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is 0.
    pub fn new(name: &'static str, capacity: usize, ttl: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            Error::Configuration(format!("cache '{name}' capacity must be greater than 0"))
        })?;
        Ok(Self {
            name,
            entries: RwLock::new(LruCache::new(capacity)),
            ttl,
        })
    }

    fn lock(&self) -> RwLockWriteGuard<'_, LruCache<K, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(|poisoned| {
            tracing::warn!(cache = self.name, "Cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Returns a live entry, refreshing its recency. Expired entries are dropped.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        let lookup = entries
            .get(key)
            .map(|entry| (entry.stored_at.elapsed() <= self.ttl).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                drop(entries);
                tracing::debug!(cache = self.name, ?key, "Cache hit");
                metrics::counter!("cache_hits_total", "cache" => self.name).increment(1);
                return Some(value);
            },
            Some(None) => {
                entries.pop(key);
                drop(entries);
                tracing::debug!(cache = self.name, ?key, "Cache entry expired");
            },
            None => drop(entries),
        }

        metrics::counter!("cache_misses_total", "cache" => self.name).increment(1);
        None
    }

    /// Stores a value, evicting the least recently used entry when full.
    pub fn insert(&self, key: K, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: Instant::now(),
        };
        if let Some((evicted, _)) = self.lock().push(key.clone(), entry) {
            if evicted != key {
                tracing::debug!(cache = self.name, key = ?evicted, "Cache entry evicted");
            }
        }
    }

    /// Removes an entry. Returns true if one was present.
    pub fn invalidate(&self, key: &K) -> bool {
        let removed = self.lock().pop(key).is_some();
        metrics::counter!("cache_invalidations_total", "cache" => self.name).increment(1);
        tracing::debug!(cache = self.name, ?key, removed, "Cache entry invalidated");
        removed
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn cache(capacity: usize, ttl: Duration) -> ExpiringCache<i64, String> {
        ExpiringCache::new("test", capacity, ttl).unwrap()
    }

    #[test]
    fn test_zero_capacity_is_configuration_error() {
        let err = ExpiringCache::<i64, String>::new("test", 0, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_get_and_invalidate() {
        let cache = cache(4, Duration::from_secs(60));
        assert!(cache.get(&1).is_none());

        cache.insert(1, "uno".to_string());
        assert_eq!(cache.get(&1).as_deref(), Some("uno"));

        assert!(cache.invalidate(&1));
        assert!(!cache.invalidate(&1));
        assert!(cache.get(&1).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        let cache = cache(2, Duration::from_secs(60));
        cache.insert(1, "uno".to_string());
        cache.insert(2, "dos".to_string());
        // Touch 1 so 2 becomes the eviction candidate
        assert!(cache.get(&1).is_some());
        cache.insert(3, "tres".to_string());

        assert!(cache.get(&1).is_some());
        assert!(cache.get(&2).is_none());
        assert!(cache.get(&3).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_entries_expire() {
        let cache = cache(2, Duration::from_millis(20));
        cache.insert(1, "uno".to_string());
        thread::sleep(Duration::from_millis(40));

        assert!(cache.get(&1).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = Arc::new(cache(8, Duration::from_secs(60)));
        cache.insert(7, "siete".to_string());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get(&7))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("siete"));
        }

        assert!(cache.invalidate(&7));
        assert!(cache.is_empty());
    }
}
