//! Preloaded repository
//!
//! Holds every persisted record in its cache, populated once at
//! construction by enumerating the backend. Lookups and iteration are
//! synchronous afterwards; writes and deletes made through records of this
//! repository keep the cache coherent via the change-listener chain.

use std::sync::Arc;

use tracing::debug;

use crate::error::{StowageError, StowageResult};
use crate::repository::cache::{CacheHandler, MapCache};
use crate::repository::container::{RecordContainer, RepositoryConfig};
use crate::repository::record::{GenericRecord, RecordKind};

/// Eagerly preloaded repository over one record kind
pub struct CachedRepository<T, R = GenericRecord<T>> {
    config: RepositoryConfig<T, R>,
    cache: Arc<dyn CacheHandler<R>>,
}

impl<T, R> CachedRepository<T, R>
where
    T: Clone + Send + Sync + 'static,
    R: RecordKind<T>,
{
    /// Enumerate the backend and load every persisted record into the cache.
    ///
    /// Installs an unbounded [`MapCache`] when the configuration carries no
    /// cache. Enumeration order is whatever the backend yields; iteration
    /// order afterwards is the cache's own.
    pub async fn preload(mut config: RepositoryConfig<T, R>) -> StowageResult<Self> {
        let cache = match config.cache.clone() {
            Some(cache) => cache,
            None => {
                let cache: Arc<dyn CacheHandler<R>> = Arc::new(MapCache::new());
                config.cache = Some(Arc::clone(&cache));
                cache
            }
        };

        let names = config.instance.storage_factory.list_names().await?;
        let mut loaded = 0usize;
        for name in &names {
            let container = RecordContainer::new(name, &config);
            if let Some(value) = container.read().await? {
                let record = container.into_record(value, false);
                cache.set(name, Some(record));
                loaded += 1;
            }
        }
        debug!(loaded, enumerated = names.len(), "preloaded records");

        Ok(Self { config, cache })
    }

    /// Construct a record from `value` without touching storage
    pub fn create_ephemeral(&self, name: &str, value: T) -> Arc<R> {
        RecordContainer::new(name, &self.config).into_record(value, true)
    }

    /// Construct a record from `value` and persist it immediately
    pub async fn create(&self, name: &str, value: T) -> StowageResult<Arc<R>> {
        let record = self.create_ephemeral(name, value);
        record.record().save().await?;
        Ok(record)
    }

    /// Look up a record in the cache; never touches storage
    pub fn get(&self, name: &str) -> Option<Arc<R>> {
        self.cache.get(name)
    }

    /// Look up a record in the cache, failing when absent
    pub fn get_or_fail(&self, name: &str) -> StowageResult<Arc<R>> {
        self.get(name).ok_or_else(|| StowageError::RecordNotFound {
            kind: R::kind_name(),
            name: name.to_string(),
        })
    }

    /// Snapshot of all cached records in the cache's iteration order.
    ///
    /// Reflects writes and deletes made through records of this repository,
    /// not external writes that bypassed it.
    pub fn entries(&self) -> Vec<(String, Arc<R>)> {
        self.cache.entries()
    }

    /// First record whose `(value, name)` satisfies the predicate
    pub fn find(&self, predicate: impl Fn(&T, &str) -> bool) -> Option<Arc<R>> {
        self.entries().into_iter().find_map(|(name, record)| {
            let value = record.record().value();
            predicate(&value, &name).then_some(record)
        })
    }

    /// All records whose `(value, name)` satisfies the predicate,
    /// preserving iteration order
    pub fn filter(&self, predicate: impl Fn(&T, &str) -> bool) -> Vec<Arc<R>> {
        self.entries()
            .into_iter()
            .filter_map(|(name, record)| {
                let value = record.record().value();
                predicate(&value, &name).then_some(record)
            })
            .collect()
    }
}
