use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use shared_config::AppConfig;

use crate::error::PaymentError;
use crate::models::StripePaymentIntent;
use crate::services::gateway::PaymentGateway;

/// Stripe Payment Intents API client.
/// Based on: https://docs.stripe.com/api/payment_intents/create
pub struct StripeClient {
    client: Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    /// POST /v1/payment_intents
    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<String, PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }

        let url = format!("{}/payment_intents", self.base_url);
        debug!("Creating payment intent of {} {} at {}", amount_minor, currency, url);

        let amount = amount_minor.to_string();
        let form = [
            ("amount", amount.as_str()),
            ("currency", currency),
            ("payment_method_types[]", "card"),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            error!("Payment intent creation failed: {} - {}", status, message);
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let intent: StripePaymentIntent = response.json().await?;
        info!("Created payment intent {}", intent.id);
        Ok(intent.client_secret)
    }
}
