//! Customer-subscription association record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, LinkId, SubscriptionId, Timestamp};

/// Non-owning association between a customer and a subscription.
///
/// Not a foreign key on `Subscription`: the link is created after the
/// subscription is persisted and can be dismissed on rollback without
/// deleting the subscription it pointed to. Graph-style customer lookups go
/// through these records; the full-scan fallback covers subscriptions whose
/// link creation failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSubscriptionLink {
    pub id: LinkId,
    pub customer_id: CustomerId,
    pub subscription_id: SubscriptionId,
    pub created_at: Timestamp,
}

impl CustomerSubscriptionLink {
    /// Creates a new link between a customer and a subscription.
    pub fn new(customer_id: CustomerId, subscription_id: SubscriptionId) -> Self {
        Self {
            id: LinkId::new(),
            customer_id,
            subscription_id,
            created_at: Timestamp::now(),
        }
    }
}
