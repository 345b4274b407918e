//! Error types raised by the storage engine and its adapters.

use super::StoreName;
use std::sync::Arc;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors surfaced by the storage engine.
///
/// Adapters translate native database failures into these variants; the
/// engine passes them through unchanged.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The embedded database could not be opened or reached.
    #[error("storage unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The object store has not been created by any schema version.
    #[error("object store '{0}' does not exist")]
    StoreMissing(StoreName),

    /// A record with the same key already exists in the store.
    #[error("duplicate key '{key}' in store '{store}'")]
    DuplicateKey {
        /// Store the insert targeted.
        store: StoreName,
        /// Conflicting key.
        key: String,
    },

    /// The addressed record does not exist.
    #[error("record '{key}' not found in store '{store}'")]
    NotFound {
        /// Store that was searched.
        store: StoreName,
        /// Missing key.
        key: String,
    },

    /// A record lacks the string attribute its store is keyed by.
    #[error("record for store '{store}' has no string '{key_path}' attribute")]
    MissingKey {
        /// Store the record was written to.
        store: StoreName,
        /// Expected key attribute.
        key_path: &'static str,
    },

    /// A write was attempted inside a read-only transaction.
    #[error("read-only transaction cannot modify store '{0}'")]
    ReadOnlyTransaction(StoreName),

    /// A record could not be converted to or from its typed form.
    #[error("malformed record: {0}")]
    Malformed(Arc<serde_json::Error>),

    /// The database was written by a newer schema than this build supports.
    #[error("database schema version {found} is newer than supported version {supported}")]
    VersionTooNew {
        /// Version recorded in the database.
        found: u32,
        /// Highest version this build knows.
        supported: u32,
    },

    /// A multi-record unit of work failed and was rolled back.
    #[error("{operation} aborted and rolled back: {source}")]
    TransactionAborted {
        /// Human-readable name of the unit of work.
        operation: &'static str,
        /// Failure that aborted it.
        source: Box<StorageError>,
    },

    /// Any other backend failure.
    #[error("persistence error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps a failure to open or reach the database.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }

    /// Wraps a backend failure.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Wraps a JSON conversion failure.
    #[must_use]
    pub fn malformed(err: serde_json::Error) -> Self {
        Self::Malformed(Arc::new(err))
    }

    /// Marks this error as the cause of a rolled-back unit of work.
    #[must_use]
    pub fn aborted(self, operation: &'static str) -> Self {
        Self::TransactionAborted {
            operation,
            source: Box::new(self),
        }
    }
}

/// Error returned while parsing an unknown store name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown object store: {0}")]
pub struct ParseStoreNameError(pub String);
