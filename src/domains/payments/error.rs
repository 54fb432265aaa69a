//! Payment-specific error types.

use thiserror::Error;

/// Errors that can occur talking to the payment gateway.
///
/// All of these surface to the caller as a gateway failure; there is
/// no retry.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The request never completed.
    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Payment gateway rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl PaymentError {
    /// Create a new "rejected" error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }
}
