use std::time::Duration;
use crate::domain::models::payment::{ChargeIntent, GatewayCharge};
use crate::domain::ports::PaymentGateway;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// HTTP client for the card payment gateway. The gateway confirms funds
/// synchronously; a timeout here is treated by callers exactly like a
/// decline, so it carries its own typed error.
pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build gateway HTTP client");
        Self { client, api_url, api_key }
    }

    fn map_send_error(e: reqwest::Error) -> AppError {
        if e.is_timeout() {
            error!("Payment gateway timed out: {}", e);
            return AppError::GatewayTimeout;
        }
        let msg = format!("gateway unreachable: {}", e);
        error!("{}", msg);
        AppError::GatewayDeclined(msg)
    }
}

#[derive(Serialize)]
struct ChargePayload {
    amount: i64,
    currency: String,
    payer_email: String,
}

#[derive(Deserialize)]
struct IntentResponse {
    client_secret: String,
}

#[derive(Deserialize)]
struct ChargeResponse {
    reference: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(&self, amount_cents: i64, currency: &str, payer_email: &str) -> Result<ChargeIntent, AppError> {
        let payload = ChargePayload {
            amount: amount_cents,
            currency: currency.to_string(),
            payer_email: payer_email.to_string(),
        };

        let res = self.client.post(format!("{}/intents", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Gateway intent creation failed. Status: {}, Body: {}", status, text);
            return Err(AppError::GatewayDeclined(format!("intent rejected ({})", status)));
        }

        let body: IntentResponse = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Malformed gateway intent response: {}", e)))?;
        Ok(ChargeIntent { client_secret: body.client_secret })
    }

    async fn charge(&self, amount_cents: i64, currency: &str, payer_email: &str) -> Result<GatewayCharge, AppError> {
        let payload = ChargePayload {
            amount: amount_cents,
            currency: currency.to_string(),
            payer_email: payer_email.to_string(),
        };

        let res = self.client.post(format!("{}/charges", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(Self::map_send_error)?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            error!("Gateway charge declined. Status: {}, Body: {}", status, text);
            return Err(AppError::GatewayDeclined(format!("charge declined ({})", status)));
        }

        let body: ChargeResponse = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Malformed gateway charge response: {}", e)))?;
        Ok(GatewayCharge { reference: body.reference })
    }
}
