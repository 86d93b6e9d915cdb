//! GetPlanAnalyticsHandler - per-plan subscription aggregates.
//!
//! Folds the full subscription set into one row per plan: a count of every
//! subscription ever taken on the plan, and a revenue total over the price
//! snapshots of the currently active ones. Snapshots, not current plan
//! prices, so later plan edits never move historical totals.

use std::sync::Arc;

use crate::domain::foundation::Money;
use crate::domain::membership::SubscriptionError;
use crate::ports::{MembershipRepository, SubscriptionStore};

/// Aggregate row for one plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanAnalytics {
    /// Plan name (the tier name).
    pub name: String,

    /// Sum of price snapshots across active subscriptions.
    pub total: Money,

    /// Number of subscriptions ever taken on this plan, any status.
    pub count: u64,
}

/// Handler for the plan analytics query.
pub struct GetPlanAnalyticsHandler {
    plans: Arc<dyn MembershipRepository>,
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl GetPlanAnalyticsHandler {
    pub fn new(
        plans: Arc<dyn MembershipRepository>,
        subscriptions: Arc<dyn SubscriptionStore>,
    ) -> Self {
        Self {
            plans,
            subscriptions,
        }
    }

    pub async fn handle(&self) -> Result<Vec<PlanAnalytics>, SubscriptionError> {
        let plans = self.plans.list_all().await?;
        let subscriptions = self.subscriptions.list_all().await?;

        let mut rows: Vec<PlanAnalytics> = plans
            .iter()
            .map(|plan| PlanAnalytics {
                name: plan.tier.display_name().to_string(),
                total: Money::ZERO,
                count: 0,
            })
            .collect();

        for subscription in &subscriptions {
            let Some(row) = plans
                .iter()
                .position(|plan| plan.tier == subscription.tier)
                .and_then(|i| rows.get_mut(i))
            else {
                // Tier no longer listed; nothing to attribute it to.
                continue;
            };
            row.count += 1;
            if subscription.is_active() {
                row.total = row.total.add(subscription.price);
            }
        }

        Ok(rows)
    }
}
