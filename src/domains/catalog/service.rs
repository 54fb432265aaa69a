//! Catalog service implementation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::CatalogError;
use crate::core::store::{
    Document, DocumentStore, Filter, collections, from_document, to_document,
};

/// A purchasable part.
///
/// `name`, `price` and `quantity` are the fields the rest of the system
/// relies on; anything else the creator supplied rides along in
/// `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Store-assigned identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name of the part.
    pub name: String,

    /// Unit price in major currency units.
    pub price: f64,

    /// Units available. Signed: order placement decrements it with no
    /// floor check, so it can go negative.
    pub quantity: i64,

    /// Opaque extra fields (description, image URL, ...).
    #[serde(flatten)]
    pub extra: Document,
}

/// Service for managing catalog items.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    /// Create a new CatalogService over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List every catalog item.
    pub async fn list(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        let docs = self
            .store
            .find_many(collections::TOOLS, &Filter::all())
            .await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(CatalogError::from))
            .collect()
    }

    /// Fetch one catalog item by identifier.
    pub async fn get(&self, id: &str) -> Result<CatalogItem, CatalogError> {
        let doc = self
            .store
            .find_one(collections::TOOLS, &Filter::by_id(id))
            .await?
            .ok_or_else(|| CatalogError::not_found(id))?;
        Ok(from_document(doc)?)
    }

    /// Create a catalog item. Returns the item with its assigned id.
    pub async fn create(&self, mut item: CatalogItem) -> Result<CatalogItem, CatalogError> {
        let doc = to_document(&item)?;
        let id = self.store.insert_one(collections::TOOLS, doc).await?;
        info!("Created catalog item '{}' ({})", item.name, id);
        item.id = Some(id);
        Ok(item)
    }

    /// Delete a catalog item by identifier. Returns whether anything
    /// was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, CatalogError> {
        let deleted = self
            .store
            .delete_one(collections::TOOLS, &Filter::by_id(id))
            .await?;
        if deleted {
            info!("Deleted catalog item {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use serde_json::json;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryStore::new()))
    }

    fn item(name: &str, quantity: i64) -> CatalogItem {
        CatalogItem {
            id: None,
            name: name.to_string(),
            price: 49.99,
            quantity,
            extra: Document::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service();
        let created = service.create(item("ssd", 30)).await.unwrap();
        let id = created.id.expect("create should assign an id");

        let fetched = service.get(&id).await.unwrap();
        assert_eq!(fetched.name, "ssd");
        assert_eq!(fetched.quantity, 30);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let result = service().get("nope").await;
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_returns_all_items() {
        let service = service();
        service.create(item("cpu", 5)).await.unwrap();
        service.create(item("gpu", 2)).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extra_fields_survive_round_trip() {
        let service = service();
        let mut new_item = item("case", 8);
        new_item
            .extra
            .insert("description".to_string(), json!("mid tower"));
        let id = service.create(new_item).await.unwrap().id.unwrap();

        let fetched = service.get(&id).await.unwrap();
        assert_eq!(fetched.extra.get("description"), Some(&json!("mid tower")));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        let id = service.create(item("psu", 4)).await.unwrap().id.unwrap();
        assert!(service.delete(&id).await.unwrap());
        assert!(!service.delete(&id).await.unwrap());
        assert!(matches!(
            service.get(&id).await,
            Err(CatalogError::NotFound(_))
        ));
    }
}
