//! Errors shared by the entity services.

use crate::storage::domain::StorageError;
use thiserror::Error;

/// Validation failures for caller-supplied values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The colour is not `#rgb` or `#rrggbb`.
    #[error("invalid colour '{0}': expected #rgb or #rrggbb")]
    InvalidColor(String),
}

/// Errors returned by entity services.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// The addressed entity does not exist.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Entity kind, such as `task`.
        kind: &'static str,
        /// Requested identifier.
        id: String,
    },
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The storage engine failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ServiceError {
    /// Builds a [`ServiceError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Result type for entity service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
