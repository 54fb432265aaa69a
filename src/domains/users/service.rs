//! User service implementation.
//!
//! Besides CRUD this service hosts the role gate: `require_admin` is
//! the ordered second precondition (after credential verification) on
//! every admin-only route. A missing user record fails closed with
//! `Forbidden` rather than faulting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::error::UserError;
use crate::core::security::Identity;
use crate::core::store::{
    Document, DocumentStore, Filter, UpdateOutcome, collections, from_document,
};

/// Role value marking an administrator.
pub const ROLE_ADMIN: &str = "admin";

/// A user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique key for the record.
    pub email: String,

    /// Role attribute; absent for plain customers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Opaque profile fields (name, address, ...).
    #[serde(flatten)]
    pub extra: Document,
}

impl User {
    /// Whether this record carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }
}

/// Service for managing user records and the admin role gate.
pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    /// Create a new UserService over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List every user record.
    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        let docs = self
            .store
            .find_many(collections::USERS, &Filter::all())
            .await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(UserError::from))
            .collect()
    }

    /// Fetch a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<User, UserError> {
        let doc = self
            .store
            .find_one(collections::USERS, &Filter::eq("email", email))
            .await?
            .ok_or_else(|| UserError::not_found(email))?;
        Ok(from_document(doc)?)
    }

    /// Upsert a user record keyed by email.
    ///
    /// `profile` is written as-is on top of the existing record; the
    /// email field is pinned to the path parameter so a body cannot
    /// re-key the record.
    pub async fn upsert(
        &self,
        email: &str,
        mut profile: Document,
    ) -> Result<UpdateOutcome, UserError> {
        profile.insert("email".to_string(), json!(email));
        let outcome = self
            .store
            .update_one(collections::USERS, &Filter::eq("email", email), profile, true)
            .await?;
        info!("Upserted user {}", email);
        Ok(outcome)
    }

    /// Promote a user to admin. The update matches zero documents if
    /// no record exists; no record is created.
    pub async fn promote_to_admin(&self, email: &str) -> Result<UpdateOutcome, UserError> {
        let mut set = Document::new();
        set.insert("role".to_string(), json!(ROLE_ADMIN));
        let outcome = self
            .store
            .update_one(collections::USERS, &Filter::eq("email", email), set, false)
            .await?;
        info!("Promoted {} to admin (matched {})", email, outcome.matched);
        Ok(outcome)
    }

    /// Whether the user with `email` carries the admin role. An absent
    /// record is simply not an admin.
    pub async fn is_admin(&self, email: &str) -> Result<bool, UserError> {
        match self.find_by_email(email).await {
            Ok(user) => Ok(user.is_admin()),
            Err(UserError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Role gate: require that the verified identity belongs to an
    /// admin. Fails closed when the user record is missing.
    pub async fn require_admin(&self, identity: &Identity) -> Result<(), UserError> {
        if self.is_admin(&identity.email).await? {
            Ok(())
        } else {
            Err(UserError::Forbidden)
        }
    }

    /// Delete a user record by identifier.
    pub async fn delete(&self, id: &str) -> Result<bool, UserError> {
        Ok(self
            .store
            .delete_one(collections::USERS, &Filter::by_id(id))
            .await?)
    }
}
