//! Error types for Stowage
//!
//! All modules use `StowageResult<T>` as their return type.

use thiserror::Error;

/// Opaque error carried for caller-supplied collaborators (validators,
/// custom storage backends).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for Stowage operations
pub type StowageResult<T> = Result<T, StowageError>;

/// All errors that can occur in Stowage
#[derive(Error, Debug)]
pub enum StowageError {
    // Lookup errors
    #[error("{kind}('{name}') not found")]
    RecordNotFound { kind: &'static str, name: String },

    // Validation errors
    #[error("validation failed: {source}")]
    Validation {
        #[source]
        source: BoxError,
    },

    // Partial-update precondition errors
    #[error("cannot apply partial update to '{name}': stored value is not an object")]
    ValueNotObject { name: String },

    #[error("partial update for '{name}' must be a JSON object")]
    PartialNotObject { name: String },

    // Storage errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {source}")]
    Storage {
        #[source]
        source: BoxError,
    },
}

impl StowageError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wrap a validator failure, keeping the original error as the source
    pub fn validation(source: impl Into<BoxError>) -> Self {
        Self::Validation {
            source: source.into(),
        }
    }

    /// Wrap a backend-defined failure from a custom storage implementation
    pub fn storage(source: impl Into<BoxError>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Check if error is the fail-fast lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}
