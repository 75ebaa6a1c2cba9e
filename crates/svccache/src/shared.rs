//! Thread-safe cache handle with usage statistics

use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use svcstore::Result;
use tracing::debug;

use crate::lru::{BoundedCache, DEFAULT_CAPACITY};
use crate::stats::CacheStats;

/// [`BoundedCache`] behind a lock, shareable across threads.
///
/// Clones share the same entries and counters.
pub struct SharedCache<K, V> {
    /// Entries; `get` reorders recency, so reads take the lock exclusively
    cache: Arc<Mutex<BoundedCache<K, V>>>,

    /// Hit/miss/insert/eviction counters
    stats: Arc<CacheStats>,

    capacity: usize,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a shared cache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries, must be positive
    ///
    /// # Returns
    /// * `Result<SharedCache>` - `InvalidConfiguration` for a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: Arc::new(Mutex::new(BoundedCache::try_new(capacity)?)),
            stats: Arc::new(CacheStats::new()),
            capacity,
        })
    }

    /// Store a value, accounting the insert and any eviction
    pub fn put(&self, key: K, value: V)
    where
        K: std::fmt::Debug,
    {
        let mut cache = self.cache.lock();
        let is_new = !cache.contains(&key);

        if let Some((evicted, _)) = cache.put(key, value) {
            debug!(key = ?evicted, "evicted least recently used entry");
            self.stats.record_eviction();
        }
        if is_new {
            self.stats.record_insert();
        }
    }

    /// Look up a value, accounting the hit or miss
    ///
    /// # Returns
    /// * `Option<V>` - A clone of the cached value
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Remove a key
    pub fn remove(&self, key: &K) -> Option<V> {
        self.cache.lock().remove(key)
    }

    /// Current number of entries
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Usage counters
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop every entry and reset the counters
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            stats: Arc::clone(&self.stats),
            capacity: self.capacity,
        }
    }
}

impl<K, V> Default for SharedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self {
            cache: Arc::new(Mutex::new(BoundedCache::default())),
            stats: Arc::new(CacheStats::new()),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_shared_basic() {
        let cache = SharedCache::try_new(10).unwrap();

        cache.put("k".to_string(), b"value".to_vec());
        assert_eq!(cache.get(&"k".to_string()), Some(b"value".to_vec()));

        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_shared_zero_capacity() {
        assert!(SharedCache::<u32, u32>::try_new(0).is_err());
    }

    #[test]
    fn test_shared_eviction() {
        let cache = SharedCache::try_new(2).unwrap();

        cache.put(0, "data 0");
        cache.put(1, "data 1");
        assert_eq!(cache.len(), 2);

        // Evicts 0
        cache.put(2, "data 2");
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions(), 1);

        assert_eq!(cache.get(&1), Some("data 1"));
        assert_eq!(cache.get(&2), Some("data 2"));
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.stats().hits(), 2);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_shared_update_is_not_insert() {
        let cache = SharedCache::try_new(2).unwrap();

        cache.put("a", 1);
        cache.put("a", 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.get(&"a"), Some(2));
    }

    #[test]
    fn test_shared_remove_and_clear() {
        let cache = SharedCache::try_new(10).unwrap();

        cache.put("a", 1);
        cache.put("b", 2);
        assert_eq!(cache.remove(&"a"), Some(1));
        cache.get(&"b");

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits(), 0);
    }

    #[test]
    fn test_key_without_debug() {
        #[derive(Clone, PartialEq, Eq, Hash)]
        struct Opaque(u32);

        let cache: SharedCache<Opaque, u32> = SharedCache::try_new(4).unwrap();
        assert_eq!(cache.get(&Opaque(1)), None);
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = SharedCache::try_new(50).unwrap();

        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..100u32 {
                        cache.put(t * 1000 + i, i);
                        cache.get(&(t * 1000 + i));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 50);
        assert_eq!(cache.stats().inserts(), 400);
        assert_eq!(cache.stats().evictions(), 350);
        assert_eq!(cache.stats().hits() + cache.stats().misses(), 400);
    }
}
