//! Review service implementation.

use std::sync::Arc;

use super::error::ReviewError;
use crate::core::store::{Document, DocumentStore, Filter, collections};

/// Service for collecting product reviews.
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
}

impl ReviewService {
    /// Create a new ReviewService over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Append a review as submitted. Returns the assigned identifier.
    pub async fn add(&self, review: Document) -> Result<String, ReviewError> {
        Ok(self.store.insert_one(collections::REVIEWS, review).await?)
    }

    /// List every review.
    pub async fn list(&self) -> Result<Vec<Document>, ReviewError> {
        Ok(self
            .store
            .find_many(collections::REVIEWS, &Filter::all())
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_two_reviews_are_both_listed() {
        let service = ReviewService::new(Arc::new(MemoryStore::new()));

        let mut first = Document::new();
        first.insert("rating".to_string(), json!(5));
        let mut second = Document::new();
        second.insert("rating".to_string(), json!(2));

        service.add(first).await.unwrap();
        service.add(second).await.unwrap();

        assert_eq!(service.list().await.unwrap().len(), 2);
    }
}
