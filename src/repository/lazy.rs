//! On-demand repository
//!
//! Multiplexes many records sharing one configuration, looking them up by
//! name as needed. With a cache configured, lookups consult it before
//! touching storage; the cache is authoritative once populated.

use std::sync::Arc;

use tracing::debug;

use crate::error::{StowageError, StowageResult};
use crate::repository::container::{RecordContainer, RepositoryConfig};
use crate::repository::record::{GenericRecord, RecordKind};

/// Lazy repository over one record kind
pub struct Repository<T, R = GenericRecord<T>> {
    config: RepositoryConfig<T, R>,
}

impl<T, R> Repository<T, R>
where
    T: Clone + Send + Sync + 'static,
    R: RecordKind<T>,
{
    /// Build a repository from its configuration
    pub fn new(config: RepositoryConfig<T, R>) -> Self {
        Self { config }
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

    /// Look up a record by name.
    ///
    /// A cache hit returns the cached instance without a storage read. On a
    /// miss the slot is read; a present value yields a persisted record
    /// (inserted into the cache when one is configured), an absent one
    /// yields `None`.
    pub async fn get(&self, name: &str) -> StowageResult<Option<Arc<R>>> {
        if let Some(hit) = self.cached(name) {
            return Ok(Some(hit));
        }
        let container = RecordContainer::new(name, &self.config);
        match container.read().await? {
            Some(value) => Ok(Some(self.admit(container, value))),
            None => Ok(None),
        }
    }

    /// Look up a record by name, falling back to `default` when the slot is
    /// empty.
    ///
    /// With `keep_ephemeral` the fallback record stays unsaved (no write
    /// occurs); otherwise it is persisted before being returned.
    pub async fn get_or_default(
        &self,
        name: &str,
        default: T,
        keep_ephemeral: bool,
    ) -> StowageResult<Arc<R>> {
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }
        let container = RecordContainer::new(name, &self.config);
        match container.read().await? {
            Some(value) => Ok(self.admit(container, value)),
            None => {
                debug!(name, keep_ephemeral, "record missing, using default");
                let record = container.into_record(default, true);
                if !keep_ephemeral {
                    record.record().save().await?;
                }
                Ok(record)
            }
        }
    }

    /// Look up a record by name, failing when the slot is empty
    pub async fn get_or_fail(&self, name: &str) -> StowageResult<Arc<R>> {
        self.get(name).await?.ok_or_else(|| StowageError::RecordNotFound {
            kind: R::kind_name(),
            name: name.to_string(),
        })
    }

    fn cached(&self, name: &str) -> Option<Arc<R>> {
        self.config.cache()?.get(name)
    }

    /// Hand a freshly-read persisted record to the cache.
    ///
    /// Ephemeral records never enter the cache; it mirrors persisted state
    /// only.
    fn admit(&self, container: RecordContainer<T, R>, value: T) -> Arc<R> {
        let name = container.name().to_string();
        let record = container.into_record(value, false);
        if let Some(cache) = self.config.cache() {
            cache.set(&name, Some(Arc::clone(&record)));
        }
        record
    }
}
