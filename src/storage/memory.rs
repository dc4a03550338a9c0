//! In-memory storage backend
//!
//! Doesn't persist anything; every factory owns its own map, so data is
//! isolated per factory instance. Useful for tests and ephemeral state.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::StowageResult;
use crate::storage::{Storage, StorageFactory};

type SharedSlots<T> = Arc<RwLock<BTreeMap<String, T>>>;

/// Factory for memory-backed storage slots
pub struct MemoryStorageFactory<T> {
    slots: SharedSlots<T>,
}

impl<T> MemoryStorageFactory<T> {
    /// Create an empty factory
    pub fn new() -> Self {
        Self {
            slots: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T> Default for MemoryStorageFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> StorageFactory<T> for MemoryStorageFactory<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn create(&self, name: &str) -> Box<dyn Storage<T>> {
        Box::new(MemoryStorage {
            name: name.to_string(),
            slots: Arc::clone(&self.slots),
        })
    }

    async fn list_names(&self) -> StowageResult<Vec<String>> {
        let slots = self.slots.read().expect("memory storage lock poisoned");
        Ok(slots.keys().cloned().collect())
    }
}

/// One named slot in a [`MemoryStorageFactory`]
pub struct MemoryStorage<T> {
    name: String,
    slots: SharedSlots<T>,
}

#[async_trait]
impl<T> Storage<T> for MemoryStorage<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self) -> StowageResult<Option<T>> {
        let slots = self.slots.read().expect("memory storage lock poisoned");
        Ok(slots.get(&self.name).cloned())
    }

    async fn set(&self, value: Option<&T>) -> StowageResult<()> {
        let mut slots = self.slots.write().expect("memory storage lock poisoned");
        match value {
            Some(value) => {
                slots.insert(self.name.clone(), value.clone());
            }
            None => {
                slots.remove(&self.name);
            }
        }
        Ok(())
    }
}
