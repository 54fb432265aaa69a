//! Bearer credential signing and verification.
//!
//! Credentials are HMAC-signed tokens carrying the holder's email and
//! an expiry one hour out (configurable). Verification is a pure
//! function of the token and the signing secret; no state is consulted
//! and none is mutated.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the credential boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header was presented.
    #[error("Missing authorization header")]
    MissingCredentials,

    /// The credential was malformed, had a bad signature, or expired.
    #[error("Invalid or expired credential")]
    InvalidToken,

    /// Signing a fresh credential failed.
    #[error("Credential signing failed: {0}")]
    Signing(String),
}

/// The verified identity extracted from a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Email the credential was issued for.
    pub email: String,
}

/// Claims embedded in a signed credential.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    email: String,
    exp: i64,
}

/// Issues and verifies bearer credentials against one shared secret.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenSigner {
    /// Create a signer for `secret` issuing credentials valid for
    /// `ttl_secs` seconds.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a fresh credential for `email`.
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        let claims = Claims {
            email: email.to_string(),
            exp: (Utc::now() + Duration::seconds(self.ttl_secs)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Verify an `Authorization` header value and extract the identity.
    ///
    /// A missing header is [`AuthError::MissingCredentials`]; anything
    /// else that fails (no `Bearer ` prefix, bad signature, expiry) is
    /// [`AuthError::InvalidToken`].
    pub fn verify_bearer(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;
        self.verify(token)
    }

    /// Verify a bare token string.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity {
            email: data.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 3600)
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let signer = signer();
        let token = signer.issue("a@x.com").unwrap();
        let identity = signer
            .verify_bearer(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(identity.email, "a@x.com");
    }

    #[test]
    fn test_missing_header_is_unauthenticated() {
        assert_eq!(
            signer().verify_bearer(None),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn test_header_without_bearer_prefix_is_rejected() {
        let signer = signer();
        let token = signer.issue("a@x.com").unwrap();
        assert_eq!(
            signer.verify_bearer(Some(&token)),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert_eq!(
            signer().verify_bearer(Some("Bearer not.a.token")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_expired_credential_is_rejected() {
        let expired = TokenSigner::new("test-secret", -120);
        let token = expired.issue("a@x.com").unwrap();
        assert_eq!(expired.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = signer().issue("a@x.com").unwrap();
        let other = TokenSigner::new("other-secret", 3600);
        assert_eq!(other.verify(&token), Err(AuthError::InvalidToken));
    }
}
