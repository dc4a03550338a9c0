//! Cache handlers
//!
//! A repository can keep an externally supplied cache synchronized with
//! persisted state. The core owns only the protocol: any mapping with the
//! capability set below can serve, from a plain map to a bounded cache with
//! its own eviction.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

/// How a cache discards entries when a record is deleted.
///
/// Resolved once when a repository is built, not re-checked per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheRemoval {
    /// The cache can drop an entry by key; deletions remove it outright
    Evict,
    /// The cache only stores; deletions overwrite the entry with an absent
    /// marker. Caches that evict by entry presence may retain marker
    /// entries; prefer implementing `remove` where possible.
    MarkAbsent,
}

/// Mapping from record name to live record instance
///
/// Entries must always reflect the backend's last known state: the record
/// instance last written under a name, or nothing once the name was deleted.
pub trait CacheHandler<R>: Send + Sync {
    /// Removal capability of this cache
    fn removal(&self) -> CacheRemoval {
        CacheRemoval::Evict
    }

    /// Look up a live record; absent markers read back as `None`
    fn get(&self, name: &str) -> Option<Arc<R>>;

    /// Store a record under `name`; `None` stores an absent marker
    fn set(&self, name: &str, record: Option<Arc<R>>);

    /// Drop the entry for `name`. Called only when [`removal`](Self::removal)
    /// reports [`CacheRemoval::Evict`].
    fn remove(&self, name: &str);

    /// Snapshot of all live entries in the cache's iteration order
    fn entries(&self) -> Vec<(String, Arc<R>)>;
}

/// Unbounded map cache, iterating in name order
///
/// The default cache installed by the cached repository when none is
/// configured.
pub struct MapCache<R> {
    entries: RwLock<BTreeMap<String, Arc<R>>>,
}

impl<R> MapCache<R> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R> Default for MapCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + Sync> CacheHandler<R> for MapCache<R> {
    fn get(&self, name: &str) -> Option<Arc<R>> {
        self.entries
            .read()
            .expect("cache lock poisoned")
            .get(name)
            .cloned()
    }

    fn set(&self, name: &str, record: Option<Arc<R>>) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        match record {
            Some(record) => {
                entries.insert(name.to_string(), record);
            }
            None => {
                entries.remove(name);
            }
        }
    }

    fn remove(&self, name: &str) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(name);
    }

    fn entries(&self) -> Vec<(String, Arc<R>)> {
        self.entries
            .read()
            .expect("cache lock poisoned")
            .iter()
            .map(|(name, record)| (name.clone(), Arc::clone(record)))
            .collect()
    }
}
