//! Axum router configuration for the membership endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, get_my_subscriptions, get_plan_analytics, handle_provider_webhook,
    list_memberships, start_checkout, update_membership, MembershipAppState,
};

/// Create the membership API router.
///
/// # Routes
///
/// ## Plan Endpoints
/// - `GET /` - List all membership plans
/// - `PUT /` - Partially update a plan (admin)
///
/// ## Subscription Endpoints (require authentication)
/// - `GET /subscription/me` - Current customer's active subscriptions
/// - `POST /subscription/checkout` - Start the checkout flow
/// - `POST /subscription/cancel` - Cancel a subscription
///
/// ## Reporting Endpoints
/// - `GET /subscription/analytics` - Per-plan aggregates (admin)
///
/// ## Webhook Endpoints (no auth; payload only trusted for the object id)
/// - `POST /subscription` - Payment provider event notifications
pub fn membership_routes() -> Router<MembershipAppState> {
    Router::new()
        .route("/", get(list_memberships).put(update_membership))
        .route("/subscription", post(handle_provider_webhook))
        .route("/subscription/me", get(get_my_subscriptions))
        .route("/subscription/analytics", get(get_plan_analytics))
        .route("/subscription/checkout", post(start_checkout))
        .route("/subscription/cancel", post(cancel_subscription))
}

/// Create the complete membership module router, mounted at `/membership`.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(membership_router())
///     .with_state(app_state);
/// ```
pub fn membership_router() -> Router<MembershipAppState> {
    Router::new().nest("/membership", membership_routes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::adapters::memory::{
        InMemoryCustomerDirectory, InMemoryMembershipRepository, InMemorySubscriptionLinker,
        InMemorySubscriptionStore,
    };
    use crate::adapters::provider::MockPaymentProvider;

    fn test_state() -> MembershipAppState {
        MembershipAppState {
            customer_directory: Arc::new(InMemoryCustomerDirectory::new()),
            membership_repository: Arc::new(InMemoryMembershipRepository::seeded()),
            subscription_store: Arc::new(InMemorySubscriptionStore::new()),
            subscription_linker: Arc::new(InMemorySubscriptionLinker::new()),
            payment_provider: Arc::new(MockPaymentProvider::new()),
            checkout_back_url: "https://store.test/membership/return".to_string(),
        }
    }

    #[test]
    fn membership_routes_creates_router() {
        let router = membership_routes();
        let _: Router<()> = router.with_state(test_state());
    }

    #[test]
    fn membership_router_creates_combined_router() {
        let router = membership_router();
        let _: Router<()> = router.with_state(test_state());
    }
}
