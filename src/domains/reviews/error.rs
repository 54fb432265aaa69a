//! Review-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Errors that can occur during review operations.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
