//! Subscription aggregate - a customer's instance of a membership plan.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, Money, SubscriptionId, Timestamp};

use super::{PlanTier, SubscriptionError};

/// Lifecycle status of a subscription.
///
/// Transitions are monotonic forward only: once `Active`, a subscription can
/// never return to `Pending`; `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    fn rank(&self) -> u8 {
        match self {
            SubscriptionStatus::Pending => 0,
            SubscriptionStatus::Active => 1,
            SubscriptionStatus::Cancelled => 2,
        }
    }

    /// Returns true if moving to `next` goes forward in the lifecycle.
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        next.rank() > self.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer's subscription to a membership plan.
///
/// `price` is a snapshot of the plan price at creation time. It is immutable
/// once set and independent of later plan price edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,

    /// Owning customer. A customer may accumulate many subscriptions over
    /// time; uniqueness lives on `external_id`, not here.
    pub customer_id: CustomerId,

    /// The payment provider's preapproval identifier. Unique at the storage
    /// layer; duplicate webhook deliveries collapse onto this key.
    pub external_id: String,

    pub tier: PlanTier,

    pub status: SubscriptionStatus,

    /// Plan price captured at creation time.
    pub price: Money,

    pub started_at: Timestamp,

    /// Next renewal / expiry boundary, provider-supplied.
    pub ended_at: Option<Timestamp>,
}

impl Subscription {
    /// Creates an active subscription with the given price snapshot.
    pub fn activate(
        customer_id: CustomerId,
        external_id: impl Into<String>,
        tier: PlanTier,
        price_snapshot: Money,
        started_at: Timestamp,
        ended_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id: SubscriptionId::new(),
            customer_id,
            external_id: external_id.into(),
            tier,
            status: SubscriptionStatus::Active,
            price: price_snapshot,
            started_at,
            ended_at,
        }
    }

    /// Moves the subscription to `next`, enforcing forward-only transitions.
    pub fn transition_to(&mut self, next: SubscriptionStatus) -> Result<(), SubscriptionError> {
        if !self.status.can_transition_to(next) {
            return Err(SubscriptionError::invalid_state(
                self.status.as_str(),
                next.as_str(),
            ));
        }
        self.status = next;
        Ok(())
    }

    /// Cancels the subscription.
    pub fn cancel(&mut self) -> Result<(), SubscriptionError> {
        self.transition_to(SubscriptionStatus::Cancelled)
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }
}
