//! Key-info cache.
//!
//! Type descriptors are immutable for the life of a controller connection,
//! so once a key's info has been fetched it never needs a second driver
//! call until the cache is explicitly cleared.

use parking_lot::Mutex;
use smckit_channel::{FourCc, KeyInfo};
use std::collections::HashMap;

/// A cache of per-key type descriptors.
///
/// Key-not-found outcomes are never cached; only descriptors the
/// controller actually reported are stored.
#[derive(Debug, Default)]
pub struct KeyInfoCache {
    entries: Mutex<HashMap<FourCc, KeyInfo>>,
}

impl KeyInfoCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached descriptor for `key`, if present.
    #[must_use]
    pub fn lookup(&self, key: FourCc) -> Option<KeyInfo> {
        self.entries.lock().get(&key).copied()
    }

    /// Stores the descriptor for `key`, replacing any previous entry.
    pub fn insert(&self, key: FourCc, info: KeyInfo) {
        self.entries.lock().insert(key, info);
    }

    /// Removes every cached descriptor.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Returns the number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(size: u32) -> KeyInfo {
        KeyInfo {
            data_size: size,
            data_type: FourCc::from_bytes(*b"ui16"),
            data_attributes: 0,
        }
    }

    #[test]
    fn lookup_miss_then_hit() {
        let cache = KeyInfoCache::new();
        let key = FourCc::from_bytes(*b"TC0P");
        assert_eq!(cache.lookup(key), None);

        cache.insert(key, info(2));
        assert_eq!(cache.lookup(key).unwrap().data_size, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn insert_replaces_previous_entry() {
        let cache = KeyInfoCache::new();
        let key = FourCc::from_bytes(*b"TC0P");
        cache.insert(key, info(2));
        cache.insert(key, info(4));
        assert_eq!(cache.lookup(key).unwrap().data_size, 4);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = KeyInfoCache::new();
        cache.insert(FourCc::from_bytes(*b"TC0P"), info(2));
        cache.insert(FourCc::from_bytes(*b"TG0P"), info(2));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(FourCc::from_bytes(*b"TC0P")), None);
    }
}
