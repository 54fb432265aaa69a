//! Orders domain module.
//!
//! The closest thing to a core in this system: placement is a two-step
//! read-then-write against the catalog followed by the order insert,
//! and reconciliation is the one mutation an order ever receives after
//! that. Both keep the semantics documented on the service: no stock
//! floor, no transaction, no idempotency.

mod error;
mod service;

pub use error::OrderError;
pub use service::{NewOrder, Order, OrderReceipt, OrderService, PaymentRecord};
