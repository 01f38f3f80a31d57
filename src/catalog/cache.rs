//! In-memory response cache with a per-entry freshness window.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    created_at: Instant,
    ttl: Duration,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        Self {
            data,
            created_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

#[derive(Debug, Clone)]
pub struct ResponseCache<T> {
    entries: Arc<RwLock<HashMap<String, CacheEntry<T>>>>,
}

impl<T: Clone> ResponseCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;
        if entry.is_expired() {
            drop(entries);
            self.remove(key);
            return None;
        }
        Some(entry.data.clone())
    }

    // A zero TTL means the response is never worth keeping; expired
    // neighbors are swept on the way in so the map stays bounded by the
    // set of live keys.
    pub fn insert(&self, key: String, value: T, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| !entry.is_expired());
            entries.insert(key, CacheEntry::new(value, ttl));
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for ResponseCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn serves_fresh_entries_and_misses_unknown_keys() {
        let cache = ResponseCache::new();
        cache.insert("a".to_string(), 1u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn drops_entries_after_their_window() {
        let cache = ResponseCache::new();
        cache.insert("a".to_string(), 1u32, Duration::from_millis(30));
        assert_eq!(cache.get("a"), Some(1));
        thread::sleep(Duration::from_millis(60));
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_ttl_is_never_stored() {
        let cache = ResponseCache::new();
        cache.insert("a".to_string(), 1u32, Duration::ZERO);
        assert_eq!(cache.get("a"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn inserting_sweeps_expired_neighbors() {
        let cache = ResponseCache::new();
        cache.insert("old".to_string(), 1u32, Duration::from_millis(20));
        thread::sleep(Duration::from_millis(40));
        cache.insert("new".to_string(), 2u32, Duration::from_secs(60));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("new"), Some(2));
    }

    #[test]
    fn same_key_takes_the_latest_value() {
        let cache = ResponseCache::new();
        cache.insert("a".to_string(), 1u32, Duration::from_secs(60));
        cache.insert("a".to_string(), 2u32, Duration::from_secs(60));
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }
}
