//! Document store adapter.
//!
//! This module abstracts the backing database as a generic key-document
//! store: named collections of JSON documents addressed by equality
//! filters, with find/insert/update/delete primitives. Services receive
//! a shared [`DocumentStore`] handle at construction time; nothing in
//! the domain layer knows which backend is behind it.
//!
//! The bundled backend is [`MemoryStore`], an in-process store used by
//! the server and the test suite alike. A remote driver would implement
//! the same trait.

mod memory;

pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::core::config::StoreConfig;

/// A stored document: a JSON object, opaque to the store.
pub type Document = serde_json::Map<String, Value>;

/// Field under which the store keeps a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Collection names used by this application.
///
/// All collections live in one database; the names mirror the entities
/// they hold.
pub mod collections {
    pub const TOOLS: &str = "tools";
    pub const USERS: &str = "users";
    pub const ORDERS: &str = "orders";
    pub const REVIEWS: &str = "reviews";
    pub const PAYMENTS: &str = "payments";
}

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document could not be converted to or from its typed model.
    #[error("Malformed document: {0}")]
    Malformed(String),

    /// The backend failed to execute the operation.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a new malformed-document error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a new backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// An equality filter over document fields.
///
/// Filters are conjunctions: a document matches when every listed field
/// equals the given value. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// A filter that matches every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match documents whose identifier equals `id`.
    pub fn by_id(id: &str) -> Self {
        Self::eq(ID_FIELD, id)
    }

    /// Match documents where `field` equals `value`.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            conditions: vec![(field.into(), value.into())],
        }
    }

    /// Add another equality condition to this filter.
    pub fn and(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Check whether `document` satisfies every condition.
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// The equality conditions, used to seed upserted documents.
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }
}

/// Result of an update operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Number of documents the filter matched.
    pub matched: u64,

    /// Number of documents actually changed.
    pub modified: u64,

    /// Identifier of the document created by an upsert, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<String>,
}

/// Generic interface over the document database.
///
/// One handle is opened at process start and shared by every service;
/// it is dropped on shutdown.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return the first document in `collection` matching `filter`.
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Return every document in `collection` matching `filter`.
    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert `document` into `collection`, assigning an identifier if
    /// it carries none. Returns the identifier.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<String, StoreError>;

    /// Set the fields of `set` on the first document matching `filter`.
    ///
    /// With `upsert`, a missing match creates a new document seeded from
    /// the filter's equality conditions plus `set`.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Delete the first document matching `filter`. Returns whether a
    /// document was removed.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError>;
}

/// Open the configured store backend.
///
/// The bundled backend keeps documents in process memory; the
/// credentials in [`StoreConfig`] are consumed by remote backends
/// plugged in behind [`DocumentStore`].
pub fn open(config: &StoreConfig) -> Arc<dyn DocumentStore> {
    info!("Opening document store '{}'", config.database);
    Arc::new(MemoryStore::new())
}

/// Serialize a typed model into a store document.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value).map_err(|e| StoreError::malformed(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::malformed(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Deserialize a store document into a typed model.
pub fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| StoreError::malformed(e.to_string()))
}
