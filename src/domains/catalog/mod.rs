//! Catalog domain module.
//!
//! Catalog items ("tools") are the purchasable parts: a name, a price,
//! and an available quantity, plus whatever extra fields the admin who
//! created them supplied. Everything here is single-call CRUD against
//! the store; the one cross-domain touch point is the order domain
//! decrementing `quantity` at placement time.

mod error;
mod service;

pub use error::CatalogError;
pub use service::{CatalogItem, CatalogService};
