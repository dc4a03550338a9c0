//! Records: persisted values with lifecycle state
//!
//! A [`Record`] pairs a persistence handle with a materialized value and an
//! ephemeral/persisted flag. `ephemeral` means the in-memory value has never
//! been confirmed as the current persisted state: the record was just
//! constructed, or deleted, or a reload found nothing.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{StowageError, StowageResult};
use crate::persist::Persist;

struct RecordState<T> {
    value: T,
    ephemeral: bool,
}

/// A named value with persistence lifecycle
///
/// Value and flag live behind one lock so they change together; the lock is
/// never held across a storage call.
pub struct Record<T> {
    persist: Persist<T>,
    state: Mutex<RecordState<T>>,
}

impl<T> Record<T>
where
    T: Clone + Send + Sync,
{
    /// Wrap a handle with a materialized value
    pub fn new(persist: Persist<T>, value: T, ephemeral: bool) -> Self {
        Self {
            persist,
            state: Mutex::new(RecordState { value, ephemeral }),
        }
    }

    /// Name of the underlying storage slot
    pub fn name(&self) -> &str {
        self.persist.name()
    }

    /// Current in-memory value
    pub fn value(&self) -> T {
        self.state.lock().expect("record lock poisoned").value.clone()
    }

    /// Whether the in-memory value is unconfirmed against storage
    pub fn ephemeral(&self) -> bool {
        self.state.lock().expect("record lock poisoned").ephemeral
    }

    /// Write the current in-memory value to storage
    pub async fn save(&self) -> StowageResult<()> {
        let value = self.value();
        self.persist.set(Some(value)).await?;
        self.state.lock().expect("record lock poisoned").ephemeral = false;
        Ok(())
    }

    /// Write `new_value` to storage, then adopt it in memory.
    ///
    /// A failed write leaves the record untouched.
    pub async fn set(&self, new_value: T) -> StowageResult<()> {
        self.persist.set(Some(new_value.clone())).await?;
        let mut state = self.state.lock().expect("record lock poisoned");
        state.value = new_value;
        state.ephemeral = false;
        Ok(())
    }

    /// Clear the storage slot and mark the record ephemeral.
    ///
    /// The in-memory value is kept; `ephemeral()` signals it is no longer
    /// authoritative.
    pub async fn delete(&self) -> StowageResult<()> {
        self.persist.set(None).await?;
        self.state.lock().expect("record lock poisoned").ephemeral = true;
        Ok(())
    }

    /// Re-read the value from storage.
    ///
    /// A present value replaces the in-memory one; an absent value only
    /// marks the record ephemeral.
    pub async fn reload(&self) -> StowageResult<()> {
        match self.persist.get().await? {
            Some(value) => {
                let mut state = self.state.lock().expect("record lock poisoned");
                state.value = value;
                state.ephemeral = false;
            }
            None => {
                self.state.lock().expect("record lock poisoned").ephemeral = true;
            }
        }
        Ok(())
    }

    /// Shallow-merge `partial` over the current value, then [`set`](Self::set)
    /// the result.
    ///
    /// Both the current value and `partial` must be JSON objects; otherwise
    /// the call fails before any side effect.
    pub async fn update(&self, partial: Value) -> StowageResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let Value::Object(fields) = partial else {
            return Err(StowageError::PartialNotObject {
                name: self.name().to_string(),
            });
        };
        let current = serde_json::to_value(self.value())?;
        let Value::Object(mut merged) = current else {
            return Err(StowageError::ValueNotObject {
                name: self.name().to_string(),
            });
        };
        for (key, value) in fields {
            merged.insert(key, value);
        }
        let new_value: T = serde_json::from_value(Value::Object(merged))?;
        self.set(new_value).await
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock().expect("record lock poisoned");
        f.debug_struct("Record")
            .field("persist", &self.persist)
            .field("value", &state.value)
            .field("ephemeral", &state.ephemeral)
            .finish()
    }
}

/// Capability interface for concrete record kinds
///
/// Repositories are generic over the kind they materialize; concrete kinds
/// wrap the base [`Record`] and add behavior by composing its operations.
pub trait RecordKind<T>: Send + Sync + Sized + 'static {
    /// Wrap the shared base record
    fn from_record(record: Record<T>) -> Self;

    /// Access the shared base record
    fn record(&self) -> &Record<T>;

    /// Short kind name used in not-found errors
    fn kind_name() -> &'static str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Default record kind with no extra behavior
#[derive(Debug)]
pub struct GenericRecord<T>(Record<T>);

impl<T> RecordKind<T> for GenericRecord<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn from_record(record: Record<T>) -> Self {
        Self(record)
    }

    fn record(&self) -> &Record<T> {
        &self.0
    }
}

impl<T> std::ops::Deref for GenericRecord<T> {
    type Target = Record<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
