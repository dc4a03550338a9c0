//! Record wiring shared by both repository flavors
//!
//! A [`RecordContainer`] builds the persistence handle for one record and,
//! when a cache is configured, chains the handle's change notification
//! through cache mutation before forwarding it to any caller-supplied
//! listener. This keeps every conforming cache coherent with writes and
//! deletes without the record types knowing about caching.

use std::sync::{Arc, OnceLock, Weak};

use crate::config::{ChangeListener, InstanceConfig};
use crate::error::StowageResult;
use crate::persist::Persist;
use crate::repository::cache::{CacheHandler, CacheRemoval};
use crate::repository::record::{Record, RecordKind};

/// Configuration shared by all records of one repository
///
/// The record kind is the type parameter `R`; immutable once a repository is
/// built, and cheap to clone.
pub struct RepositoryConfig<T, R> {
    pub(crate) instance: InstanceConfig<T>,
    pub(crate) cache: Option<Arc<dyn CacheHandler<R>>>,
}

impl<T, R> RepositoryConfig<T, R> {
    /// Create a repository configuration without caching
    pub fn new(instance: InstanceConfig<T>) -> Self {
        Self {
            instance,
            cache: None,
        }
    }

    /// Keep the given cache synchronized with every write and delete
    pub fn with_cache(mut self, cache: Arc<dyn CacheHandler<R>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The configured cache, if any
    pub fn cache(&self) -> Option<&Arc<dyn CacheHandler<R>>> {
        self.cache.as_ref()
    }
}

impl<T, R> Clone for RepositoryConfig<T, R> {
    fn clone(&self) -> Self {
        Self {
            instance: self.instance.clone(),
            cache: self.cache.clone(),
        }
    }
}

/// Builds one record and its cache-synchronized handle
pub(crate) struct RecordContainer<T, R> {
    name: String,
    persist: Persist<T>,
    slot: Arc<OnceLock<Weak<R>>>,
}

impl<T, R> RecordContainer<T, R>
where
    T: Clone + Send + Sync + 'static,
    R: RecordKind<T>,
{
    pub(crate) fn new(name: &str, config: &RepositoryConfig<T, R>) -> Self {
        let slot = Arc::new(OnceLock::new());
        let mut instance = config.instance.clone();
        if let Some(cache) = &config.cache {
            // Cache mutation runs first, then the caller's listener
            instance.on_change = Some(chain_listener(
                name,
                Arc::clone(cache),
                Arc::clone(&slot),
                instance.on_change.take(),
            ));
        }
        let persist = Persist::new(name, instance);
        Self {
            name: name.to_string(),
            persist,
            slot,
        }
    }

    /// Read the slot this container addresses
    pub(crate) async fn read(&self) -> StowageResult<Option<T>> {
        self.persist.get().await
    }

    /// Materialize the record, filling the slot the chained listener
    /// resolves the instance through
    pub(crate) fn into_record(self, value: T, ephemeral: bool) -> Arc<R> {
        let record = Arc::new(R::from_record(Record::new(self.persist, value, ephemeral)));
        let _ = self.slot.set(Arc::downgrade(&record));
        record
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap the external listener with cache synchronization.
///
/// The record is reached through a weak slot filled at materialization, so
/// the listener does not keep the record alive (the record owns the handle,
/// which owns this listener).
fn chain_listener<T, R>(
    name: &str,
    cache: Arc<dyn CacheHandler<R>>,
    slot: Arc<OnceLock<Weak<R>>>,
    external: Option<ChangeListener<T>>,
) -> ChangeListener<T>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    let name = name.to_string();
    Arc::new(move |value: Option<&T>| {
        match value {
            None => match cache.removal() {
                CacheRemoval::Evict => cache.remove(&name),
                CacheRemoval::MarkAbsent => cache.set(&name, None),
            },
            Some(_) => {
                if let Some(record) = slot.get().and_then(Weak::upgrade) {
                    cache.set(&name, Some(record));
                }
            }
        }
        if let Some(listener) = &external {
            listener(value);
        }
    })
}
