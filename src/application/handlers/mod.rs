//! Application handlers.
//!
//! Command and query handlers that orchestrate the subscription domain.

mod cancel_subscription;
mod create_subscription;
mod get_my_subscriptions;
mod get_plan_analytics;
mod list_memberships;
mod reconcile_webhook;
mod start_checkout;
mod update_membership;

pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
    LINK_FAILURE_POLICY,
};
pub use get_my_subscriptions::{GetMySubscriptionsHandler, GetMySubscriptionsQuery};
pub use get_plan_analytics::{GetPlanAnalyticsHandler, PlanAnalytics};
pub use list_memberships::ListMembershipsHandler;
pub use reconcile_webhook::{ReconcileOutcome, ReconcileWebhookCommand, ReconcileWebhookHandler};
pub use start_checkout::{StartCheckoutCommand, StartCheckoutHandler, StartCheckoutResult};
pub use update_membership::{UpdateMembershipCommand, UpdateMembershipHandler, UpdateMembershipResult};
