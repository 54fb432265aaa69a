//! In-process store backend.
//!
//! Collections are plain vectors of documents behind one `RwLock`.
//! Each trait method takes the lock once; there is no cross-call
//! transaction, so multi-step service operations interleave freely,
//! exactly like independent calls against a remote store would.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Document, DocumentStore, Filter, ID_FIELD, StoreError, UpdateOutcome};

/// Document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Pull the identifier out of a document, generating one when absent.
fn ensure_id(document: &mut Document) -> String {
    match document.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => {
            let id = Uuid::new_v4().to_string();
            document.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> Result<String, StoreError> {
        let id = ensure_id(&mut document);
        let mut collections = self.collections.write().await;
        collections.entry(collection.to_string()).or_default().push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
        upsert: bool,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if let Some(doc) = docs.iter_mut().find(|doc| filter.matches(doc)) {
            let mut modified = false;
            for (field, value) in set {
                if doc.get(&field) != Some(&value) {
                    doc.insert(field, value);
                    modified = true;
                }
            }
            return Ok(UpdateOutcome {
                matched: 1,
                modified: u64::from(modified),
                upserted_id: None,
            });
        }

        if upsert {
            // New document seeded from the filter's equality conditions,
            // then the update applied on top.
            let mut document = Document::new();
            for (field, value) in filter.conditions() {
                document.insert(field.clone(), value.clone());
            }
            for (field, value) in set {
                document.insert(field, value);
            }
            let id = ensure_id(&mut document);
            docs.push(document);
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
                upserted_id: Some(id),
            });
        }

        Ok(UpdateOutcome {
            matched: 0,
            modified: 0,
            upserted_id: None,
        })
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_finds_by_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("tools", doc(&[("name", json!("cpu"))]))
            .await
            .unwrap();

        let found = store
            .find_one("tools", &Filter::by_id(&id))
            .await
            .unwrap()
            .expect("inserted document should be found");
        assert_eq!(found.get("name"), Some(&json!("cpu")));
        assert_eq!(found.get(ID_FIELD), Some(&json!(id)));
    }

    #[tokio::test]
    async fn test_insert_keeps_caller_supplied_id() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("tools", doc(&[(ID_FIELD, json!("tool-1"))]))
            .await
            .unwrap();
        assert_eq!(id, "tool-1");
    }

    #[tokio::test]
    async fn test_find_many_filters_by_field() {
        let store = MemoryStore::new();
        store
            .insert_one("orders", doc(&[("email", json!("a@x.com"))]))
            .await
            .unwrap();
        store
            .insert_one("orders", doc(&[("email", json!("b@x.com"))]))
            .await
            .unwrap();
        store
            .insert_one("orders", doc(&[("email", json!("a@x.com"))]))
            .await
            .unwrap();

        let mine = store
            .find_many("orders", &Filter::eq("email", "a@x.com"))
            .await
            .unwrap();
        assert_eq!(mine.len(), 2);

        let all = store.find_many("orders", &Filter::all()).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_update_existing_document() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("tools", doc(&[("quantity", json!(10))]))
            .await
            .unwrap();

        let outcome = store
            .update_one(
                "tools",
                &Filter::by_id(&id),
                doc(&[("quantity", json!(7))]),
                false,
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.modified, 1);
        assert!(outcome.upserted_id.is_none());

        let found = store
            .find_one("tools", &Filter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("quantity"), Some(&json!(7)));
    }

    #[tokio::test]
    async fn test_update_without_match_is_a_no_op() {
        let store = MemoryStore::new();
        let outcome = store
            .update_one(
                "orders",
                &Filter::by_id("missing"),
                doc(&[("paid", json!(true))]),
                false,
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 0);
        assert_eq!(outcome.modified, 0);
        assert!(outcome.upserted_id.is_none());
    }

    #[tokio::test]
    async fn test_upsert_creates_document_seeded_from_filter() {
        let store = MemoryStore::new();
        let outcome = store
            .update_one(
                "users",
                &Filter::eq("email", "u@x.com"),
                doc(&[("name", json!("U"))]),
                true,
            )
            .await
            .unwrap();
        let id = outcome.upserted_id.expect("upsert should create a document");

        let found = store
            .find_one("users", &Filter::by_id(&id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("email"), Some(&json!("u@x.com")));
        assert_eq!(found.get("name"), Some(&json!("U")));
    }

    #[tokio::test]
    async fn test_upsert_updates_existing_instead_of_duplicating() {
        let store = MemoryStore::new();
        let filter = Filter::eq("email", "u@x.com");
        store
            .update_one("users", &filter, doc(&[("name", json!("U"))]), true)
            .await
            .unwrap();
        let outcome = store
            .update_one("users", &filter, doc(&[("name", json!("V"))]), true)
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);
        assert!(outcome.upserted_id.is_none());

        let all = store.find_many("users", &Filter::all()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].get("name"), Some(&json!("V")));
    }

    #[tokio::test]
    async fn test_delete_one() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("tools", doc(&[("name", json!("gpu"))]))
            .await
            .unwrap();

        assert!(store.delete_one("tools", &Filter::by_id(&id)).await.unwrap());
        assert!(!store.delete_one("tools", &Filter::by_id(&id)).await.unwrap());
        assert!(
            store
                .find_one("tools", &Filter::by_id(&id))
                .await
                .unwrap()
                .is_none()
        );
    }
}
