//! HTTP payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the provider's REST API.
//! The access token is handled via `secrecy::SecretString` and sent as a
//! bearer credential.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    CheckoutSession, CreatePreapprovalRequest, Payment, PaymentError, PaymentProvider,
    PaymentStatus, Preapproval, PreapprovalStatus,
};

/// Provider API configuration.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Bearer access token.
    access_token: SecretString,

    /// Base URL for the provider API.
    api_base_url: String,
}

impl ProviderConfig {
    pub fn new(access_token: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: api_base_url.into(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Payment provider adapter over HTTP.
pub struct HttpPaymentProvider {
    config: ProviderConfig,
    http_client: reqwest::Client,
}

impl HttpPaymentProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        object_id: &str,
    ) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .get(self.url(path))
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::NotFound(object_id.to_string()));
        }
        if !response.status().is_success() {
            return Err(PaymentError::Request(format!(
                "provider returned {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PaymentError::Malformed(e.to_string()))
    }
}

/// Wire representation of a preapproval object.
#[derive(Debug, Deserialize)]
struct PreapprovalResponse {
    id: String,
    status: PreapprovalStatus,
    #[serde(default)]
    external_reference: Option<String>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
}

/// Wire representation of a payment object.
#[derive(Debug, Deserialize)]
struct PaymentResponse {
    id: serde_json::Value,
    status: PaymentStatus,
    #[serde(default)]
    external_reference: Option<String>,
}

/// Wire representation of a created preapproval.
#[derive(Debug, Deserialize)]
struct CreatePreapprovalResponse {
    id: String,
    init_point: String,
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn fetch_preapproval(&self, preapproval_id: &str) -> Result<Preapproval, PaymentError> {
        let response: PreapprovalResponse = self
            .get_json(&format!("/preapproval/{}", preapproval_id), preapproval_id)
            .await?;

        Ok(Preapproval {
            id: response.id,
            status: response.status,
            external_reference: response.external_reference.unwrap_or_default(),
            end_date: response.end_date.map(Timestamp::from_datetime),
        })
    }

    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        let response: PaymentResponse = self
            .get_json(&format!("/v1/payments/{}", payment_id), payment_id)
            .await?;

        // Payment ids arrive as numbers; normalize to a string.
        let id = match response.id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };

        Ok(Payment {
            id,
            status: response.status,
            external_reference: response.external_reference,
        })
    }

    async fn create_preapproval(
        &self,
        request: CreatePreapprovalRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let body = serde_json::json!({
            "reason": request.reason,
            "external_reference": request.external_reference,
            "back_url": request.back_url,
            "auto_recurring": {
                "frequency": 1,
                "frequency_type": "months",
                "transaction_amount": request.amount_cents as f64 / 100.0,
            },
        });

        let response = self
            .http_client
            .post(self.url("/preapproval"))
            .bearer_auth(self.config.access_token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PaymentError::Request(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let created: CreatePreapprovalResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Malformed(e.to_string()))?;

        Ok(CheckoutSession {
            preapproval_id: created.id,
            init_point: created.init_point,
        })
    }
}
