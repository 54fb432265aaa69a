//! HTTP-facing error type.
//!
//! Every handler converts its failures into `ApiError`, which carries
//! the status mapping of the system's error taxonomy: missing
//! credential 401, bad credential or failed role gate 403, absent
//! entity 404, gateway failure 502, anything else 500. The response
//! body is always `{"message": ...}`.

use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::core::security::AuthError;
use crate::core::store::StoreError;
use crate::domains::catalog::CatalogError;
use crate::domains::orders::OrderError;
use crate::domains::payments::PaymentError;
use crate::domains::reviews::ReviewError;
use crate::domains::users::UserError;

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credential was presented.
    #[error("unauthorized access")]
    Unauthenticated,

    /// The credential was bad, or the role gate denied the caller.
    #[error("forbidden access")]
    Forbidden,

    /// A referenced entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The payment gateway failed.
    #[error("payment gateway failure")]
    Gateway(String),

    /// Anything else; detail is logged, not sent.
    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::Gateway(detail) => {
                tracing::error!(error = %detail, "Payment gateway failure")
            }
            ApiError::Internal(detail) => tracing::error!(error = %detail, "Handler failure"),
            _ => {}
        }
        let body = Json(serde_json::json!({ "message": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::Unauthenticated,
            AuthError::InvalidToken => Self::Forbidden,
            AuthError::Signing(detail) => Self::Internal(detail),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => Self::NotFound(err.to_string()),
            CatalogError::Store(e) => e.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Forbidden => Self::Forbidden,
            UserError::NotFound(_) => Self::NotFound(err.to_string()),
            UserError::Store(e) => e.into(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::ProductNotFound(_) | OrderError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            OrderError::Store(e) => e.into(),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Store(e) => e.into(),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::Gateway(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Gateway("x".to_string()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Internal("x".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_errors_split_401_from_403() {
        assert!(matches!(
            ApiError::from(AuthError::MissingCredentials),
            ApiError::Unauthenticated
        ));
        assert!(matches!(
            ApiError::from(AuthError::InvalidToken),
            ApiError::Forbidden
        ));
    }

    #[test]
    fn test_role_gate_denial_is_forbidden() {
        assert!(matches!(
            ApiError::from(UserError::Forbidden),
            ApiError::Forbidden
        ));
    }
}
