//! External reference codec.
//!
//! The store embeds a structured payload in the provider's opaque
//! "external reference" field when creating a preapproval. The webhook later
//! parses it back to correlate the provider object with a local customer and
//! plan.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::CustomerId;

use super::{PlanTier, SubscriptionError};

/// Correlation payload carried through the provider round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub customer_id: CustomerId,
    pub membership_id: PlanTier,
}

impl ExternalReference {
    pub fn new(customer_id: CustomerId, membership_id: PlanTier) -> Self {
        Self {
            customer_id,
            membership_id,
        }
    }

    /// Encodes the reference as the JSON string handed to the provider.
    pub fn encode(&self) -> String {
        // Serialization of two plain fields cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Decodes a reference string returned by the provider.
    ///
    /// A malformed reference will never become valid on retry, so callers in
    /// the webhook path treat this error as a terminal no-op.
    pub fn decode(raw: &str) -> Result<Self, SubscriptionError> {
        serde_json::from_str(raw)
            .map_err(|e| SubscriptionError::correlation(format!("bad external reference: {}", e)))
    }
}
