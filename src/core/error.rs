//! Error types and handling for the shop server.
//!
//! This module defines a unified error type that can represent errors
//! from all domains and external dependencies. The HTTP layer has its
//! own `ApiError` for mapping failures onto status codes; this type is
//! what the process-level paths (startup, serving) report.

use thiserror::Error;

/// A specialized Result type for shop server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the shop server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error from the credential boundary.
    #[error("Auth error: {0}")]
    Auth(#[from] crate::core::security::AuthError),

    /// Error from the document store.
    #[error("Store error: {0}")]
    Store(#[from] crate::core::store::StoreError),

    /// Error originating from the catalog domain.
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::domains::catalog::CatalogError),

    /// Error originating from the users domain.
    #[error("User error: {0}")]
    User(#[from] crate::domains::users::UserError),

    /// Error originating from the orders domain.
    #[error("Order error: {0}")]
    Order(#[from] crate::domains::orders::OrderError),

    /// Error originating from the reviews domain.
    #[error("Review error: {0}")]
    Review(#[from] crate::domains::reviews::ReviewError),

    /// Error originating from the payments domain.
    #[error("Payment error: {0}")]
    Payment(#[from] crate::domains::payments::PaymentError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from the listener or network.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
