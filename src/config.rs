//! Per-instance configuration shared by handles and repositories
//!
//! An [`InstanceConfig`] is assembled once, then cloned cheaply into every
//! handle or repository built from it; all collaborators are behind `Arc`.

use std::sync::Arc;

use crate::error::BoxError;
use crate::storage::StorageFactory;

/// Fallible transform applied to payloads at the read and/or write boundary.
///
/// A validator may normalize the payload or strictly check its shape; the
/// failure kind is opaque to the core.
pub type Validator<T> = Arc<dyn Fn(T) -> Result<T, BoxError> + Send + Sync>;

/// Fire-and-forget side effect invoked after a durable write.
///
/// Called with the final written value, or `None` when the slot was cleared.
pub type ChangeListener<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

/// Configuration for a persistence handle
pub struct InstanceConfig<T> {
    /// Produces storage slots per name
    pub storage_factory: Arc<dyn StorageFactory<T>>,

    /// Optional payload validator
    pub validator: Option<Validator<T>>,

    /// Apply the validator when reading (on by default)
    pub validate_get: bool,

    /// Apply the validator when writing (off by default)
    pub validate_set: bool,

    /// Optional change listener, invoked after each durable write
    pub on_change: Option<ChangeListener<T>>,
}

impl<T> InstanceConfig<T> {
    /// Create a configuration with default validation gating
    pub fn new(storage_factory: Arc<dyn StorageFactory<T>>) -> Self {
        Self {
            storage_factory,
            validator: None,
            validate_get: true,
            validate_set: false,
            on_change: None,
        }
    }

    /// Install a payload validator
    pub fn with_validator(
        mut self,
        validator: impl Fn(T) -> Result<T, BoxError> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Toggle validation on reads
    pub fn with_validate_get(mut self, enabled: bool) -> Self {
        self.validate_get = enabled;
        self
    }

    /// Toggle validation on writes
    pub fn with_validate_set(mut self, enabled: bool) -> Self {
        self.validate_set = enabled;
        self
    }

    /// Install a change listener
    pub fn with_on_change(mut self, listener: impl Fn(Option<&T>) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(listener));
        self
    }
}

impl<T> Clone for InstanceConfig<T> {
    fn clone(&self) -> Self {
        Self {
            storage_factory: Arc::clone(&self.storage_factory),
            validator: self.validator.clone(),
            validate_get: self.validate_get,
            validate_set: self.validate_set,
            on_change: self.on_change.clone(),
        }
    }
}
