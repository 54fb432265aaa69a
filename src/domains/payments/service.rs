//! Payment gateway bridge.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::PaymentError;
use crate::core::config::GatewayConfig;

/// A freshly created payment intent, as handed to the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Client secret the storefront uses to confirm the charge.
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// Shape of the gateway's intent response; only the client secret is
/// consumed.
#[derive(Debug, Deserialize)]
struct GatewayIntent {
    client_secret: String,
}

/// Bridge to the external payment gateway.
pub struct PaymentGateway {
    http: reqwest::Client,
    config: GatewayConfig,
}

impl PaymentGateway {
    /// Create a new gateway bridge with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a payment intent for `total_amount` major currency units.
    ///
    /// The amount is converted to integer minor units; currency is
    /// fixed to "usd" and card is the only accepted payment method.
    pub async fn create_intent(&self, total_amount: f64) -> Result<PaymentIntent, PaymentError> {
        let amount = to_minor_units(total_amount);
        let params = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.config.base_url))
            .basic_auth(&self.config.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::rejected(status.as_u16(), message));
        }

        let intent: GatewayIntent = response.json().await?;
        info!("Created payment intent for {} minor units", amount);
        Ok(PaymentIntent {
            client_secret: intent.client_secret,
        })
    }
}

/// Convert an amount in major currency units to integer minor units.
pub(crate) fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
