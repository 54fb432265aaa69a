//! Payments domain module.
//!
//! A thin bridge to the external payment gateway: the only operation
//! is creating a payment intent for a given amount. Reconciling a
//! completed payment against an order lives in the orders domain.

mod error;
mod service;

pub use error::PaymentError;
pub use service::{PaymentGateway, PaymentIntent};
