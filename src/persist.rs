//! Single-value persistence handle
//!
//! A [`Persist`] wraps one named storage slot with optional validation and
//! change notification. It is the building block the record and repository
//! layers are assembled from, and can be used on its own for single values.

use crate::config::InstanceConfig;
use crate::error::{StowageError, StowageResult};
use crate::storage::Storage;

/// Handle to one named storage slot
pub struct Persist<T> {
    name: String,
    storage: Box<dyn Storage<T>>,
    config: InstanceConfig<T>,
}

impl<T> std::fmt::Debug for Persist<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persist").field("name", &self.name).finish()
    }
}

impl<T: Send + Sync> Persist<T> {
    /// Create a handle for `name`; the slot comes from the configured factory
    pub fn new(name: impl Into<String>, config: InstanceConfig<T>) -> Self {
        let name = name.into();
        let storage = config.storage_factory.create(&name);
        Self {
            name,
            storage,
            config,
        }
    }

    /// Name of the slot this handle addresses
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the slot.
    ///
    /// An absent value is `Ok(None)` and never reaches the validator. A
    /// present value passes through the validator when `validate_get` is
    /// enabled; validator failures propagate to the caller.
    pub async fn get(&self) -> StowageResult<Option<T>> {
        let value = self.storage.get().await?;
        match value {
            Some(value) if self.config.validate_get => Ok(Some(self.validate(value)?)),
            other => Ok(other),
        }
    }

    /// Write the slot; `None` clears it.
    ///
    /// With `validate_set` enabled a present value is validated before the
    /// write. The change listener fires only after the write completed, with
    /// the final value (`None` when clearing).
    pub async fn set(&self, value: Option<T>) -> StowageResult<()> {
        let value = match value {
            Some(value) if self.config.validate_set => Some(self.validate(value)?),
            other => other,
        };
        self.storage.set(value.as_ref()).await?;
        if let Some(listener) = &self.config.on_change {
            listener(value.as_ref());
        }
        Ok(())
    }

    fn validate(&self, value: T) -> StowageResult<T> {
        match &self.config.validator {
            Some(validator) => validator(value).map_err(|e| StowageError::Validation { source: e }),
            None => Ok(value),
        }
    }
}
