//! HTTP DTOs for the membership endpoints.
//!
//! JSON request/response shapes forming the boundary between HTTP and the
//! application layer.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{PlanAnalytics, StartCheckoutResult};
use crate::domain::membership::{Membership, PlanTier, Subscription, SubscriptionStatus};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to partially update a membership plan.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMembershipRequest {
    /// Tier identifying the plan to update.
    pub id: PlanTier,

    /// New plan name; must stay within the closed tier-name set.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// New price in minor units.
    #[serde(default)]
    pub price_cents: Option<i64>,
}

/// Request to start a subscription checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct StartCheckoutRequest {
    /// The plan tier to subscribe to.
    pub membership_id: PlanTier,
}

/// Request to cancel a subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct CancelSubscriptionRequest {
    pub subscription_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A membership plan as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipResponse {
    pub id: PlanTier,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// Last update time (ISO 8601).
    pub updated_at: String,
}

impl From<Membership> for MembershipResponse {
    fn from(plan: Membership) -> Self {
        Self {
            id: plan.tier,
            name: plan.name,
            description: plan.description,
            price_cents: plan.price.cents(),
            updated_at: plan.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// A subscription as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub tier: PlanTier,
    pub status: SubscriptionStatus,
    /// Price snapshot captured at creation, in minor units.
    pub price_cents: i64,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(subscription: Subscription) -> Self {
        Self {
            id: subscription.id.to_string(),
            tier: subscription.tier,
            status: subscription.status,
            price_cents: subscription.price.cents(),
            started_at: subscription.started_at.as_datetime().to_rfc3339(),
            ended_at: subscription
                .ended_at
                .map(|t| t.as_datetime().to_rfc3339()),
        }
    }
}

/// Per-plan analytics row.
#[derive(Debug, Clone, Serialize)]
pub struct PlanAnalyticsResponse {
    pub name: String,
    /// Active-subscription revenue total in minor units.
    pub total_cents: i64,
    /// Subscriptions ever taken on the plan, any status.
    pub count: u64,
}

impl From<PlanAnalytics> for PlanAnalyticsResponse {
    fn from(row: PlanAnalytics) -> Self {
        Self {
            name: row.name,
            total_cents: row.total.cents(),
            count: row.count,
        }
    }
}

/// Response for checkout initiation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub preapproval_id: String,
    /// URL where the customer authorizes the recurring payment.
    pub init_point: String,
}

impl From<StartCheckoutResult> for CheckoutResponse {
    fn from(result: StartCheckoutResult) -> Self {
        Self {
            preapproval_id: result.preapproval_id,
            init_point: result.init_point,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Response DTO
// ════════════════════════════════════════════════════════════════════════════════

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
