//! Catalog-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The requested catalog item does not exist.
    #[error("Catalog item not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    /// Create a new "not found" error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
