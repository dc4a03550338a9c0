//! File storage backend
//!
//! Persists one file per name under a base directory, as
//! `<base_dir>/<prefix><name>.<extension>`. Values are encoded through a
//! pluggable [`Codec`]; the default is compact JSON.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::debug;

use crate::error::{StowageError, StowageResult};
use crate::storage::{Storage, StorageFactory};

/// Byte codec for file contents
pub trait Codec<T>: Send + Sync {
    /// Encode a value to the bytes written to disk
    fn encode(&self, value: &T) -> StowageResult<Vec<u8>>;

    /// Decode a value from the bytes read from disk
    fn decode(&self, bytes: &[u8]) -> StowageResult<T>;
}

/// Default codec: compact JSON
pub struct JsonCodec;

impl<T> Codec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> StowageResult<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8]) -> StowageResult<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Factory for file-backed storage slots
pub struct FileStorageFactory<T> {
    base_dir: PathBuf,
    extension: String,
    prefix: String,
    codec: Arc<dyn Codec<T>>,
}

impl<T> FileStorageFactory<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Create a factory writing JSON files under `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: "json".to_string(),
            prefix: String::new(),
            codec: Arc::new(JsonCodec),
        }
    }
}

impl<T> FileStorageFactory<T> {
    /// Use a custom file extension (without the leading dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Prefix every file name; files without the prefix are ignored by
    /// [`StorageFactory::list_names`]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Use a custom byte codec instead of JSON
    pub fn with_codec(mut self, codec: Arc<dyn Codec<T>>) -> Self {
        self.codec = codec;
        self
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}{}.{}", self.prefix, name, self.extension))
    }
}

#[async_trait]
impl<T> StorageFactory<T> for FileStorageFactory<T>
where
    T: Send + Sync + 'static,
{
    fn create(&self, name: &str) -> Box<dyn Storage<T>> {
        Box::new(FileStorage {
            path: self.file_path(name),
            codec: Arc::clone(&self.codec),
            _marker: PhantomData,
        })
    }

    async fn list_names(&self) -> StowageResult<Vec<String>> {
        if !self.base_dir.exists() {
            return Ok(vec![]);
        }

        let suffix = format!(".{}", self.extension);
        let mut names = vec![];
        let mut entries = fs::read_dir(&self.base_dir)
            .await
            .map_err(|e| StowageError::io("reading storage directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StowageError::io("reading storage directory entry", e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = file_name
                .strip_prefix(&self.prefix)
                .and_then(|rest| rest.strip_suffix(&suffix))
            {
                if !name.is_empty() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

/// One named slot in a [`FileStorageFactory`]
pub struct FileStorage<T> {
    path: PathBuf,
    codec: Arc<dyn Codec<T>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FileStorage<T> {
    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl<T> Storage<T> for FileStorage<T>
where
    T: Send + Sync + 'static,
{
    async fn get(&self) -> StowageResult<Option<T>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StowageError::io(
                format!("reading {}", self.path.display()),
                e,
            )),
        }
    }

    async fn set(&self, value: Option<&T>) -> StowageResult<()> {
        let Some(value) = value else {
            return match fs::remove_file(&self.path).await {
                Ok(()) => {
                    debug!("Removed {}", self.path.display());
                    Ok(())
                }
                // Already absent; clearing stays idempotent
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(StowageError::io(
                    format!("removing {}", self.path.display()),
                    e,
                )),
            };
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StowageError::io("creating storage directory", e))?;
        }

        let bytes = self.codec.encode(value)?;
        fs::write(&self.path, bytes).await.map_err(|e| {
            StowageError::io(format!("writing {}", self.path.display()), e)
        })?;

        debug!("Wrote {}", self.path.display());
        Ok(())
    }
}
