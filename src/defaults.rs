//! Process-wide default instance
//!
//! Optional convenience layer over the core: one process-wide configuration
//! with a default record name, for applications persisting a handful of
//! values without wiring configs everywhere. Payloads are JSON values;
//! typed callers construct an [`InstanceConfig`] explicitly instead.
//!
//! The core never reads these defaults. Tests mutating them should run
//! serialized and call [`restore_built_in`] between cases.

use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::InstanceConfig;
use crate::error::StowageResult;
use crate::persist::Persist;
use crate::repository::{CachedRepository, GenericRecord, Repository, RepositoryConfig};
use crate::storage::{FileStorageFactory, StorageFactory};

/// Process-wide default configuration
pub struct Defaults {
    /// Backend used by the default instance
    pub storage_factory: Arc<dyn StorageFactory<Value>>,

    /// Apply validators on reads
    pub validate_get: bool,

    /// Apply validators on writes
    pub validate_set: bool,

    /// Record name used when none is given
    pub default_name: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            storage_factory: Arc::new(FileStorageFactory::new("data")),
            validate_get: true,
            validate_set: false,
            default_name: "default".to_string(),
        }
    }
}

impl Clone for Defaults {
    fn clone(&self) -> Self {
        Self {
            storage_factory: Arc::clone(&self.storage_factory),
            validate_get: self.validate_get,
            validate_set: self.validate_set,
            default_name: self.default_name.clone(),
        }
    }
}

static DEFAULTS: Lazy<RwLock<Defaults>> = Lazy::new(|| RwLock::new(Defaults::default()));

/// Replace the process-wide defaults
pub fn set(defaults: Defaults) {
    *DEFAULTS.write().expect("defaults lock poisoned") = defaults;
}

/// Snapshot of the current defaults
pub fn current() -> Defaults {
    DEFAULTS.read().expect("defaults lock poisoned").clone()
}

/// Reset to the built-in defaults (file storage under `data/`, record name
/// `default`)
pub fn restore_built_in() {
    set(Defaults::default());
}

/// Instance configuration derived from the current defaults
pub fn instance_config() -> InstanceConfig<Value> {
    let defaults = current();
    InstanceConfig::new(defaults.storage_factory)
        .with_validate_get(defaults.validate_get)
        .with_validate_set(defaults.validate_set)
}

fn default_handle() -> Persist<Value> {
    Persist::new(current().default_name, instance_config())
}

/// Write `value` to the default-named slot
pub async fn persist<V: Serialize>(value: &V) -> StowageResult<()> {
    let value = serde_json::to_value(value)?;
    default_handle().set(Some(value)).await
}

/// Clear the default-named slot
pub async fn erase() -> StowageResult<()> {
    default_handle().set(None).await
}

/// Read the default-named slot
pub async fn obtain<V: DeserializeOwned>() -> StowageResult<Option<V>> {
    match default_handle().get().await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Default-named record.
///
/// With a `default` value, a missing slot yields an ephemeral record built
/// from it (nothing is written); without one it yields `None`.
pub async fn record(
    default: Option<Value>,
) -> StowageResult<Option<Arc<GenericRecord<Value>>>> {
    let repo = repo();
    let name = current().default_name;
    match default {
        Some(value) => repo.get_or_default(&name, value, true).await.map(Some),
        None => repo.get(&name).await,
    }
}

/// On-demand repository over the current defaults
pub fn repo() -> Repository<Value> {
    Repository::new(RepositoryConfig::new(instance_config()))
}

/// Preloaded repository over the current defaults
pub async fn preload_repo() -> StowageResult<CachedRepository<Value>> {
    CachedRepository::preload(RepositoryConfig::new(instance_config())).await
}
