//! Payment provider port for the external recurring-payment service.
//!
//! # Design
//!
//! - **Canonical state only**: webhook payloads are never trusted beyond the
//!   object id they carry; reconciliation fetches the canonical object from
//!   the provider before acting.
//! - **Outbound intents**: subscription checkout starts with a
//!   preapproval-creation call that embeds the encoded external reference
//!   the webhook later parses back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Errors from payment provider calls.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    #[error("provider object not found: {0}")]
    NotFound(String),

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider response could not be parsed: {0}")]
    Malformed(String),
}

/// Status of a recurring-payment authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreapprovalStatus {
    Pending,
    Authorized,
    Paused,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Canonical preapproval object fetched from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preapproval {
    /// Provider's preapproval id; stored locally as `external_id`.
    pub id: String,

    pub status: PreapprovalStatus,

    /// Opaque reference the store embedded at creation time.
    pub external_reference: String,

    /// Next renewal / expiry boundary.
    pub end_date: Option<Timestamp>,
}

/// Status of a one-off payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Rejected,
    Pending,
    #[serde(other)]
    Other,
}

/// Canonical payment object fetched from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub status: PaymentStatus,
    pub external_reference: Option<String>,
}

/// Request to create a preapproval (subscription intent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePreapprovalRequest {
    /// Human-readable reason shown on the provider's checkout page.
    pub reason: String,

    /// Recurring amount in minor units.
    pub amount_cents: i64,

    /// Encoded external reference carrying {customer_id, membership_id}.
    pub external_reference: String,

    /// Where the provider sends the customer after checkout.
    pub back_url: String,
}

/// Checkout hand-off returned by preapproval creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's preapproval id.
    pub preapproval_id: String,

    /// URL the customer visits to authorize the recurring payment.
    pub init_point: String,
}

/// Port for the external payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Fetch the canonical preapproval object by id.
    async fn fetch_preapproval(&self, preapproval_id: &str) -> Result<Preapproval, PaymentError>;

    /// Fetch the canonical payment object by id.
    async fn fetch_payment(&self, payment_id: &str) -> Result<Payment, PaymentError>;

    /// Create a preapproval, embedding the external reference.
    async fn create_preapproval(
        &self,
        request: CreatePreapprovalRequest,
    ) -> Result<CheckoutSession, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn preapproval_status_parses_known_values() {
        let status: PreapprovalStatus = serde_json::from_str("\"authorized\"").unwrap();
        assert_eq!(status, PreapprovalStatus::Authorized);
    }

    #[test]
    fn preapproval_status_tolerates_unknown_values() {
        let status: PreapprovalStatus = serde_json::from_str("\"something_new\"").unwrap();
        assert_eq!(status, PreapprovalStatus::Unknown);
    }

    #[test]
    fn payment_status_tolerates_unknown_values() {
        let status: PaymentStatus = serde_json::from_str("\"in_mediation\"").unwrap();
        assert_eq!(status, PaymentStatus::Other);
    }
}
