//! Order service implementation.
//!
//! Placement runs three sequential store calls with no transaction
//! around them: fetch the catalog item, write back the decremented
//! quantity, insert the order. Two placements against the same item can
//! interleave between the fetch and the write-back, so the smaller
//! decrement can be lost. That race is the documented baseline of this
//! system and is deliberately not serialized here.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::error::OrderError;
use crate::core::store::{
    Document, DocumentStore, Filter, UpdateOutcome, collections, from_document, to_document,
};
use crate::domains::catalog::CatalogItem;

/// An order as submitted by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    /// Identifier of the catalog item being purchased.
    #[serde(rename = "productId")]
    pub product_id: String,

    /// Units requested. Not validated against available stock.
    pub order_quantity: i64,

    /// Owner of the order.
    pub email: String,

    /// Opaque extra fields (shipping address, phone, ...).
    #[serde(flatten)]
    pub extra: Document,
}

/// A stored order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned identifier.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Identifier of the catalog item being purchased.
    #[serde(rename = "productId")]
    pub product_id: String,

    /// Units purchased.
    pub order_quantity: i64,

    /// Owner of the order.
    pub email: String,

    /// Whether the order has been reconciled against a payment.
    #[serde(default)]
    pub paid: bool,

    /// Gateway transaction identifier, set at reconciliation.
    #[serde(rename = "transactionId", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Opaque extra fields carried over from submission.
    #[serde(flatten)]
    pub extra: Document,
}

/// What placement hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// The order as inserted.
    pub order: Order,

    /// Always true on the success path.
    pub success: bool,
}

/// A payment as reported by the client at reconciliation time.
///
/// The transaction identifier is caller-supplied; nothing here checks
/// it against the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Gateway transaction identifier.
    #[serde(rename = "transactionId")]
    pub transaction_id: String,

    /// Opaque extra fields of the payment payload.
    #[serde(flatten)]
    pub extra: Document,
}

/// Service for placing, querying and reconciling orders.
pub struct OrderService {
    store: Arc<dyn DocumentStore>,
}

impl OrderService {
    /// Create a new OrderService over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Place an order against a catalog item.
    ///
    /// Fetches the item, writes back `quantity - order_quantity`
    /// unconditionally (no stock floor: the count can go negative),
    /// then inserts the order with `paid` forced to false. The three
    /// steps are not atomic and the quantity write-back is not rolled
    /// back if the insert fails.
    pub async fn place(&self, order: NewOrder) -> Result<OrderReceipt, OrderError> {
        let item_doc = self
            .store
            .find_one(collections::TOOLS, &Filter::by_id(&order.product_id))
            .await?
            .ok_or_else(|| OrderError::product_not_found(&order.product_id))?;
        let item: CatalogItem = from_document(item_doc)?;

        let new_quantity = item.quantity - order.order_quantity;
        if new_quantity < 0 {
            warn!(
                "Order for {} x{} drives stock negative ({})",
                order.product_id, order.order_quantity, new_quantity
            );
        }
        let mut set = Document::new();
        set.insert("quantity".to_string(), json!(new_quantity));
        self.store
            .update_one(
                collections::TOOLS,
                &Filter::by_id(&order.product_id),
                set,
                false,
            )
            .await?;

        let mut doc = to_document(&order)?;
        doc.insert("paid".to_string(), json!(false));
        let id = self.store.insert_one(collections::ORDERS, doc).await?;
        info!(
            "Placed order {} for {} x{} ({})",
            id, order.product_id, order.order_quantity, order.email
        );

        Ok(OrderReceipt {
            order: Order {
                id: Some(id),
                product_id: order.product_id,
                order_quantity: order.order_quantity,
                email: order.email,
                paid: false,
                transaction_id: None,
                extra: order.extra,
            },
            success: true,
        })
    }

    /// List every order.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        let docs = self
            .store
            .find_many(collections::ORDERS, &Filter::all())
            .await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(OrderError::from))
            .collect()
    }

    /// List the orders owned by `email`.
    pub async fn list_by_email(&self, email: &str) -> Result<Vec<Order>, OrderError> {
        let docs = self
            .store
            .find_many(collections::ORDERS, &Filter::eq("email", email))
            .await?;
        docs.into_iter()
            .map(|doc| from_document(doc).map_err(OrderError::from))
            .collect()
    }

    /// Fetch one order by identifier.
    pub async fn get(&self, id: &str) -> Result<Order, OrderError> {
        let doc = self
            .store
            .find_one(collections::ORDERS, &Filter::by_id(id))
            .await?
            .ok_or_else(|| OrderError::not_found(id))?;
        Ok(from_document(doc)?)
    }

    /// Delete an order by identifier.
    pub async fn delete(&self, id: &str) -> Result<bool, OrderError> {
        Ok(self
            .store
            .delete_one(collections::ORDERS, &Filter::by_id(id))
            .await?)
    }

    /// Reconcile a payment against an order.
    ///
    /// Sets `paid` and the transaction identifier on the order, then
    /// appends the payment payload to the ledger. Both writes proceed
    /// unconditionally: an unknown order id matches nothing yet the
    /// ledger entry is still appended, and repeated calls append
    /// repeated entries. The transaction identifier is trusted as
    /// reported by the client.
    pub async fn mark_paid(
        &self,
        order_id: &str,
        payment: PaymentRecord,
    ) -> Result<UpdateOutcome, OrderError> {
        let mut set = Document::new();
        set.insert("paid".to_string(), json!(true));
        set.insert(
            "transactionId".to_string(),
            json!(payment.transaction_id),
        );
        let outcome = self
            .store
            .update_one(collections::ORDERS, &Filter::by_id(order_id), set, false)
            .await?;

        let ledger_entry = to_document(&payment)?;
        self.store
            .insert_one(collections::PAYMENTS, ledger_entry)
            .await?;
        info!(
            "Reconciled order {} with transaction {}",
            order_id, payment.transaction_id
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;
    use crate::domains::catalog::CatalogService;

    struct Fixture {
        store: Arc<MemoryStore>,
        catalog: CatalogService,
        orders: OrderService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        Fixture {
            catalog: CatalogService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            store,
        }
    }

    async fn seed_item(fixture: &Fixture, quantity: i64) -> String {
        fixture
            .catalog
            .create(CatalogItem {
                id: None,
                name: "ram".to_string(),
                price: 79.99,
                quantity,
                extra: Document::new(),
            })
            .await
            .unwrap()
            .id
            .unwrap()
    }

    fn order_for(product_id: &str, quantity: i64) -> NewOrder {
        NewOrder {
            product_id: product_id.to_string(),
            order_quantity: quantity,
            email: "buyer@x.com".to_string(),
            extra: Document::new(),
        }
    }

    #[tokio::test]
    async fn test_placement_decrements_stock_exactly() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 10).await;

        let receipt = fixture.orders.place(order_for(&item_id, 3)).await.unwrap();
        assert!(receipt.success);
        assert!(!receipt.order.paid);
        assert!(receipt.order.id.is_some());

        assert_eq!(fixture.catalog.get(&item_id).await.unwrap().quantity, 7);
    }

    #[tokio::test]
    async fn test_placement_allows_negative_stock() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 2).await;

        fixture.orders.place(order_for(&item_id, 5)).await.unwrap();

        assert_eq!(fixture.catalog.get(&item_id).await.unwrap().quantity, -3);
    }

    #[tokio::test]
    async fn test_placement_against_missing_item_is_not_found() {
        let fixture = fixture();
        let result = fixture.orders.place(order_for("missing", 1)).await;
        assert!(matches!(result, Err(OrderError::ProductNotFound(_))));
        assert!(fixture.orders.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_placement_forces_paid_false() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 10).await;

        let mut order = order_for(&item_id, 1);
        // A client claiming its own order is already paid.
        order.extra.insert("paid".to_string(), json!(true));
        let receipt = fixture.orders.place(order).await.unwrap();

        let stored = fixture
            .orders
            .get(receipt.order.id.as_deref().unwrap())
            .await
            .unwrap();
        assert!(!stored.paid);
    }

    #[tokio::test]
    async fn test_list_by_email_filters_owner() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 10).await;

        fixture.orders.place(order_for(&item_id, 1)).await.unwrap();
        let mut other = order_for(&item_id, 1);
        other.email = "other@x.com".to_string();
        fixture.orders.place(other).await.unwrap();

        let mine = fixture.orders.list_by_email("buyer@x.com").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(fixture.orders.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_mark_paid_sets_fields_and_appends_ledger() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 10).await;
        let receipt = fixture.orders.place(order_for(&item_id, 1)).await.unwrap();
        let order_id = receipt.order.id.unwrap();

        let outcome = fixture
            .orders
            .mark_paid(
                &order_id,
                PaymentRecord {
                    transaction_id: "T1".to_string(),
                    extra: Document::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 1);

        let order = fixture.orders.get(&order_id).await.unwrap();
        assert!(order.paid);
        assert_eq!(order.transaction_id.as_deref(), Some("T1"));

        let ledger = fixture
            .store
            .find_many(collections::PAYMENTS, &Filter::all())
            .await
            .unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].get("transactionId"), Some(&json!("T1")));
    }

    #[tokio::test]
    async fn test_mark_paid_twice_appends_two_ledger_entries() {
        let fixture = fixture();
        let item_id = seed_item(&fixture, 10).await;
        let receipt = fixture.orders.place(order_for(&item_id, 1)).await.unwrap();
        let order_id = receipt.order.id.unwrap();

        for _ in 0..2 {
            fixture
                .orders
                .mark_paid(
                    &order_id,
                    PaymentRecord {
                        transaction_id: "T1".to_string(),
                        extra: Document::new(),
                    },
                )
                .await
                .unwrap();
        }

        let ledger = fixture
            .store
            .find_many(collections::PAYMENTS, &Filter::all())
            .await
            .unwrap();
        assert_eq!(ledger.len(), 2);
    }

    #[tokio::test]
    async fn test_mark_paid_unknown_order_still_appends_ledger() {
        let fixture = fixture();

        let outcome = fixture
            .orders
            .mark_paid(
                "missing",
                PaymentRecord {
                    transaction_id: "T9".to_string(),
                    extra: Document::new(),
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome.matched, 0);

        let ledger = fixture
            .store
            .find_many(collections::PAYMENTS, &Filter::all())
            .await
            .unwrap();
        assert_eq!(ledger.len(), 1);
    }
}
