//! Parts Shop Server Library
//!
//! This crate provides a small e-commerce backend: REST endpoints over
//! a document store for catalog items, users with an admin role flag,
//! orders with inventory decrement, product reviews, and payment
//! processing through a third-party gateway.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Infrastructure — configuration, error handling, the
//!   credential boundary, the document store adapter, and the HTTP
//!   surface
//! - **domains**: Business logic organized by bounded contexts
//!   - **catalog**: purchasable parts
//!   - **users**: user records, upsert-by-email, the admin role gate
//!   - **orders**: placement with inventory decrement, reconciliation
//!   - **reviews**: append-only product reviews
//!   - **payments**: payment gateway bridge
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parts_shop_server::{Config, ShopServer};
//! use parts_shop_server::core::store::MemoryStore;
//!
//! let config = Config::from_env();
//! let store = Arc::new(MemoryStore::new());
//! let server = ShopServer::new(config, store);
//! // Hand the server to HttpServer::run...
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, HttpServer, Result, ShopServer};
