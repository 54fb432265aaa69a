//! Order-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The catalog item the order references does not exist.
    #[error("Catalog item not found: {0}")]
    ProductNotFound(String),

    /// The requested order does not exist.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    /// Create a new "product not found" error.
    pub fn product_not_found(id: impl Into<String>) -> Self {
        Self::ProductNotFound(id.into())
    }

    /// Create a new "order not found" error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}
