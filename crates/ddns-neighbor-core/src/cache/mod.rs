// # Neighbor Cache
//
// Memoizes normalized, ranked device lists per origin so that repeated
// lookups in one editing session do not re-run the neighbor collector.
//
// ## Invalidation
//
// There is no TTL. Entries live until one of:
// - `invalidate(key)`: a forced rescan of one origin
// - `clear()`: the owning view is rendered afresh
//
// ## Concurrency
//
// The cache is a plain map with no synchronization of its own. It is owned by
// `ChoiceProvider`, which serializes access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::normalize::NormalizedDevice;

/// One cached result set
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Ranked devices
    pub devices: Vec<NormalizedDevice>,
    /// When the entry was stored
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry stamped with the current time
    pub fn new(devices: Vec<NormalizedDevice>) -> Self {
        Self {
            devices,
            stored_at: Utc::now(),
        }
    }

    /// Time since the entry was stored
    pub fn age(&self) -> chrono::Duration {
        Utc::now().signed_duration_since(self.stored_at)
    }
}

/// Per-origin cache of normalized device lists
///
/// Keys are origin cache keys (`interface:br-lan`, `network:lan`).
#[derive(Debug, Default)]
pub struct NeighborCache {
    entries: HashMap<String, CacheEntry>,
}

impl NeighborCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached entry for `key`
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Store `devices` under `key`, replacing any previous entry
    pub fn put(&mut self, key: impl Into<String>, devices: Vec<NormalizedDevice>) {
        self.entries.insert(key.into(), CacheEntry::new(devices));
    }

    /// Drop the entry for `key`; returns whether one existed
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached origins
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NeighborNormalizer;
    use crate::payload::{NeighborPayload, RawNeighbor};

    fn devices() -> Vec<NormalizedDevice> {
        let payload = NeighborPayload::new(
            vec![RawNeighbor::new("aa:bb:cc:dd:ee:ff").with_addresses(["2001:db8::1"])],
            vec![],
        );
        NeighborNormalizer::default().normalize(&payload, None)
    }

    #[test]
    fn test_cache_basic() {
        let mut cache = NeighborCache::new();

        // Initially empty
        assert!(cache.is_empty());
        assert!(cache.get("interface:br-lan").is_none());

        // Put and get
        cache.put("interface:br-lan", devices());
        assert_eq!(cache.len(), 1);
        let entry = cache.get("interface:br-lan").unwrap();
        assert_eq!(entry.devices.len(), 1);
        assert!(entry.age() >= chrono::Duration::zero());

        // Keys are independent
        assert!(cache.get("network:br-lan").is_none());

        // Invalidate
        assert!(cache.invalidate("interface:br-lan"));
        assert!(!cache.invalidate("interface:br-lan"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = NeighborCache::new();
        cache.put("interface:br-lan", devices());
        cache.put("network:lan", Vec::new());

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["interface:br-lan", "network:lan"]);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_empty_result_is_cached() {
        let mut cache = NeighborCache::new();
        cache.put("network:guest", Vec::new());
        assert!(cache.get("network:guest").unwrap().devices.is_empty());
    }
}
