//! User-specific error types.

use thiserror::Error;

use crate::core::store::StoreError;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// The caller is not an admin (or has no user record at all).
    #[error("Admin privileges required")]
    Forbidden,

    /// The requested user does not exist.
    #[error("User not found: {0}")]
    NotFound(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl UserError {
    /// Create a new "not found" error.
    pub fn not_found(email: impl Into<String>) -> Self {
        Self::NotFound(email.into())
    }
}
