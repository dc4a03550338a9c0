//! Stowage - Pluggable record persistence
//!
//! Treats named values as typed, validated, observably-changing records
//! over any storage backend, with optional caching kept synchronized with
//! persisted state.
//!
//! The layers, bottom up: a [`Storage`]/[`StorageFactory`] backend addresses
//! single named slots; a [`Persist`] handle adds validation and change
//! notification to one slot; a [`Record`] adds a materialized value with an
//! ephemeral/persisted lifecycle; [`Repository`] and [`CachedRepository`]
//! multiplex many records behind one configuration.

pub mod config;
pub mod defaults;
pub mod error;
pub mod persist;
pub mod repository;
pub mod storage;

pub use config::{ChangeListener, InstanceConfig, Validator};
pub use error::{BoxError, StowageError, StowageResult};
pub use persist::Persist;
pub use repository::{
    CacheHandler, CacheRemoval, CachedRepository, GenericRecord, MapCache, Record, RecordKind,
    Repository, RepositoryConfig,
};
pub use storage::{
    Codec, FileStorage, FileStorageFactory, JsonCodec, MemoryStorage, MemoryStorageFactory,
    Storage, StorageFactory,
};
