//! Storage backends
//!
//! A backend addresses single named slots. Absence of a value is a
//! first-class result (`Ok(None)`), never an error; backends fail only with
//! their own IO errors.

pub mod file;
pub mod memory;

pub use file::{Codec, FileStorage, FileStorageFactory, JsonCodec};
pub use memory::{MemoryStorage, MemoryStorageFactory};

use async_trait::async_trait;

use crate::error::StowageResult;

/// One named storage slot
#[async_trait]
pub trait Storage<T>: Send + Sync {
    /// Read the current value of the slot; `None` means nothing is stored
    async fn get(&self) -> StowageResult<Option<T>>;

    /// Write `value` to the slot; `None` clears it.
    ///
    /// Clearing an already-empty slot must succeed (idempotent).
    async fn set(&self, value: Option<&T>) -> StowageResult<()>;
}

/// Produces storage slots per name for one backend instance
#[async_trait]
pub trait StorageFactory<T>: Send + Sync {
    /// Create a storage slot addressing `name`
    fn create(&self, name: &str) -> Box<dyn Storage<T>>;

    /// Enumerate all names currently persisted in this backend.
    ///
    /// Returns an empty list when nothing exists or the underlying medium
    /// has not been initialized yet.
    async fn list_names(&self) -> StowageResult<Vec<String>>;
}
