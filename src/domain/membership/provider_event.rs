//! Payment provider webhook event types.
//!
//! The provider pushes a generic event envelope; only the fields needed for
//! dispatch and the canonical-state fetch are captured. Pushed payload fields
//! are never treated as authoritative beyond enabling that fetch.

use serde::{Deserialize, Serialize};

/// Generic provider event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEvent {
    /// Action verb, e.g. "created" or "updated".
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub application_id: Option<String>,

    /// Object reference carried by the event.
    pub data: ProviderEventData,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub entity: Option<String>,

    /// Provider-side event id.
    #[serde(default)]
    pub id: Option<serde_json::Value>,

    /// Discriminator for the event class.
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub version: Option<serde_json::Value>,
}

/// Object reference inside the envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderEventData {
    /// Id of the provider object the event is about.
    pub id: String,
}

/// Event classes this service distinguishes, keyed on the `type` field.
///
/// Each variant carries only the fields relevant to that class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEventKind {
    /// Recurring-payment authorization object changed.
    Preapproval { preapproval_id: String },

    /// A payment was created or updated. Observability only; no
    /// subscription state change happens on this path.
    Payment { payment_id: String },

    /// Merchant order notification. Acknowledged, never acted on.
    MerchantOrder { order_id: String },

    /// Anything else the provider may push.
    Unknown { event_type: String },
}

impl ProviderEvent {
    /// Classifies the envelope into a known event kind.
    pub fn kind(&self) -> ProviderEventKind {
        match self.event_type.as_str() {
            "subscription_preapproval" => ProviderEventKind::Preapproval {
                preapproval_id: self.data.id.clone(),
            },
            "payment" => ProviderEventKind::Payment {
                payment_id: self.data.id.clone(),
            },
            "merchant_order" => ProviderEventKind::MerchantOrder {
                order_id: self.data.id.clone(),
            },
            other => ProviderEventKind::Unknown {
                event_type: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(event_type: &str) -> ProviderEvent {
        serde_json::from_value(serde_json::json!({
            "action": "updated",
            "application_id": "1234567890",
            "data": { "id": "obj-1" },
            "date": "2024-05-01T12:00:00Z",
            "entity": "preapproval",
            "id": 99,
            "type": event_type,
            "version": 1
        }))
        .unwrap()
    }

    #[test]
    fn preapproval_events_are_classified() {
        let kind = envelope("subscription_preapproval").kind();
        assert_eq!(
            kind,
            ProviderEventKind::Preapproval {
                preapproval_id: "obj-1".to_string()
            }
        );
    }

    #[test]
    fn payment_events_are_classified() {
        let kind = envelope("payment").kind();
        assert_eq!(
            kind,
            ProviderEventKind::Payment {
                payment_id: "obj-1".to_string()
            }
        );
    }

    #[test]
    fn merchant_order_events_are_classified() {
        let kind = envelope("merchant_order").kind();
        assert_eq!(
            kind,
            ProviderEventKind::MerchantOrder {
                order_id: "obj-1".to_string()
            }
        );
    }

    #[test]
    fn unrecognized_types_map_to_unknown() {
        let kind = envelope("plan").kind();
        assert_eq!(
            kind,
            ProviderEventKind::Unknown {
                event_type: "plan".to_string()
            }
        );
    }

    #[test]
    fn envelope_parses_with_minimal_fields() {
        let event: ProviderEvent = serde_json::from_value(serde_json::json!({
            "data": { "id": "p-77" },
            "type": "payment"
        }))
        .unwrap();
        assert_eq!(event.data.id, "p-77");
    }

    #[test]
    fn envelope_without_data_id_fails_structural_validation() {
        let result: Result<ProviderEvent, _> = serde_json::from_value(serde_json::json!({
            "type": "payment"
        }));
        assert!(result.is_err());
    }
}
