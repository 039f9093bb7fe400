//! In-memory local cache.

use moka::sync::Cache;

use super::{CacheError, LocalCache};

/// [`LocalCache`] held in process memory.
///
/// Cheaply cloneable; clones share entries.
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, String>,
}

impl MemoryCache {
    /// Maximum number of keys kept before the least used are evicted.
    pub const MAX_ENTRIES: u64 = 10_000;

    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .name("local-cache")
                .max_capacity(Self::MAX_ENTRIES)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("order-shop-1"), None);
    }

    #[test]
    fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("order-shop-1", r#"{"fish-1":3}"#.to_string()).unwrap();
        assert_eq!(cache.get("order-shop-1").as_deref(), Some(r#"{"fish-1":3}"#));
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "1".to_string()).unwrap();
        cache.set("k", "2".to_string()).unwrap();
        assert_eq!(cache.get("k").as_deref(), Some("2"));
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        cache.set("k", "v".to_string()).unwrap();
        assert_eq!(other.get("k").as_deref(), Some("v"));
    }
}
