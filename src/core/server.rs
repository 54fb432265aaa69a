//! Shop server composition and lifecycle.
//!
//! `ShopServer` wires the domain services together: it receives the
//! one store handle opened at startup and hands each service its own
//! reference. Handlers reach services through accessor methods; no
//! service is a process-wide global.

use std::sync::Arc;

use super::config::Config;
use super::security::TokenSigner;
use super::store::DocumentStore;
use crate::domains::{
    catalog::CatalogService, orders::OrderService, payments::PaymentGateway,
    reviews::ReviewService, users::UserService,
};

/// The assembled application: configuration plus one instance of every
/// domain service, all sharing the injected store handle.
#[derive(Clone)]
pub struct ShopServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Credential issuance and verification.
    signer: Arc<TokenSigner>,

    /// Catalog item CRUD.
    catalog: Arc<CatalogService>,

    /// User records and the role gate.
    users: Arc<UserService>,

    /// Order placement, queries, reconciliation.
    orders: Arc<OrderService>,

    /// Append-only review collection.
    reviews: Arc<ReviewService>,

    /// External payment gateway bridge.
    payments: Arc<PaymentGateway>,
}

impl ShopServer {
    /// Create a new shop server from configuration and a store handle.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let signer = Arc::new(TokenSigner::new(
            &config.auth.access_token_secret,
            config.auth.token_ttl_secs,
        ));
        let payments = Arc::new(PaymentGateway::new(config.gateway.clone()));

        Self {
            config: Arc::new(config),
            signer,
            catalog: Arc::new(CatalogService::new(store.clone())),
            users: Arc::new(UserService::new(store.clone())),
            orders: Arc::new(OrderService::new(store.clone())),
            reviews: Arc::new(ReviewService::new(store)),
            payments,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Credential signer.
    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Catalog service.
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// User service.
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Order service.
    pub fn orders(&self) -> &OrderService {
        &self.orders
    }

    /// Review service.
    pub fn reviews(&self) -> &ReviewService {
        &self.reviews
    }

    /// Payment gateway bridge.
    pub fn payments(&self) -> &PaymentGateway {
        &self.payments
    }
}
