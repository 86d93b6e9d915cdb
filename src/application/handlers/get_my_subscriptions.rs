//! GetMySubscriptionsHandler - dual-path subscription read.
//!
//! The primary path resolves the customer's link records and fetches the
//! referenced subscriptions. The fallback path scans by the subscription's
//! own `customer_id` field, so subscriptions whose link creation was
//! tolerated-failed remain discoverable. Results are merged, deduplicated,
//! filtered to active, and returned newest first.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::CustomerId;
use crate::domain::membership::{Subscription, SubscriptionError};
use crate::ports::{SubscriptionLinker, SubscriptionStore};

/// Query for a customer's active subscriptions.
#[derive(Debug, Clone)]
pub struct GetMySubscriptionsQuery {
    pub customer_id: CustomerId,
}

/// Handler for the customer-facing subscriptions read.
pub struct GetMySubscriptionsHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
    linker: Arc<dyn SubscriptionLinker>,
}

impl GetMySubscriptionsHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionStore>,
        linker: Arc<dyn SubscriptionLinker>,
    ) -> Self {
        Self {
            subscriptions,
            linker,
        }
    }

    pub async fn handle(
        &self,
        query: GetMySubscriptionsQuery,
    ) -> Result<Vec<Subscription>, SubscriptionError> {
        let linked_ids = self
            .linker
            .subscription_ids_for(&query.customer_id)
            .await?;
        let mut found = self.subscriptions.find_by_ids(&linked_ids).await?;

        // Both paths always run; a partially-linked customer would otherwise
        // see only the linked subset.
        let scanned = self
            .subscriptions
            .scan_by_customer_id(&query.customer_id)
            .await?;
        if scanned.len() > found.len() {
            debug!(
                customer_id = %query.customer_id,
                linked = found.len(),
                scanned = scanned.len(),
                "customer-id scan found subscriptions missing from the link path"
            );
        }

        let mut seen: HashSet<_> = found.iter().map(|s| s.id).collect();
        for subscription in scanned {
            if seen.insert(subscription.id) {
                found.push(subscription);
            }
        }

        let mut active: Vec<Subscription> =
            found.into_iter().filter(Subscription::is_active).collect();
        active.sort_by(|a, b| b.started_at.as_datetime().cmp(a.started_at.as_datetime()));
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySubscriptionLinker, InMemorySubscriptionStore};
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::membership::{CustomerSubscriptionLink, PlanTier, SubscriptionStatus};
    use crate::ports::InsertOutcome;

    struct Fixture {
        subscriptions: Arc<InMemorySubscriptionStore>,
        linker: Arc<InMemorySubscriptionLinker>,
        handler: GetMySubscriptionsHandler,
        customer_id: CustomerId,
    }

    fn fixture() -> Fixture {
        let subscriptions = Arc::new(InMemorySubscriptionStore::new());
        let linker = Arc::new(InMemorySubscriptionLinker::new());
        let handler = GetMySubscriptionsHandler::new(subscriptions.clone(), linker.clone());
        Fixture {
            subscriptions,
            linker,
            handler,
            customer_id: CustomerId::new(),
        }
    }

    async fn insert_subscription(
        f: &Fixture,
        external_id: &str,
        started_at: Timestamp,
        linked: bool,
    ) -> Subscription {
        let subscription = Subscription::activate(
            f.customer_id,
            external_id,
            PlanTier::Essential,
            Money::from_cents(2990).unwrap(),
            started_at,
            None,
        );
        assert_eq!(
            f.subscriptions.insert(&subscription).await.unwrap(),
            InsertOutcome::Inserted
        );
        if linked {
            let link = CustomerSubscriptionLink::new(f.customer_id, subscription.id);
            f.linker.create(&link).await.unwrap();
        }
        subscription
    }

    #[tokio::test]
    async fn linked_active_subscriptions_come_back_newest_first() {
        let f = fixture();
        let older = insert_subscription(&f, "pre-1", Timestamp::now(), true).await;
        let newer = insert_subscription(&f, "pre-2", Timestamp::now().add_days(1), true).await;

        let result = f
            .handler
            .handle(GetMySubscriptionsQuery {
                customer_id: f.customer_id,
            })
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].id, newer.id);
        assert_eq!(result[1].id, older.id);
    }

    #[tokio::test]
    async fn unlinked_subscription_is_found_by_the_fallback_scan() {
        let f = fixture();
        let unlinked = insert_subscription(&f, "pre-1", Timestamp::now(), false).await;

        let result = f
            .handler
            .handle(GetMySubscriptionsQuery {
                customer_id: f.customer_id,
            })
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, unlinked.id);
    }

    #[tokio::test]
    async fn partially_linked_customer_sees_both_paths_merged_without_duplicates() {
        let f = fixture();
        insert_subscription(&f, "pre-linked", Timestamp::now(), true).await;
        insert_subscription(&f, "pre-orphan", Timestamp::now().add_days(1), false).await;

        let result = f
            .handler
            .handle(GetMySubscriptionsQuery {
                customer_id: f.customer_id,
            })
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        let ids: HashSet<_> = result.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn cancelled_subscriptions_are_filtered_out() {
        let f = fixture();
        let subscription = insert_subscription(&f, "pre-1", Timestamp::now(), true).await;
        f.subscriptions
            .update_status(&subscription.id, SubscriptionStatus::Cancelled)
            .await
            .unwrap();

        let result = f
            .handler
            .handle(GetMySubscriptionsQuery {
                customer_id: f.customer_id,
            })
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn other_customers_subscriptions_are_invisible() {
        let f = fixture();
        insert_subscription(&f, "pre-1", Timestamp::now(), true).await;

        let result = f
            .handler
            .handle(GetMySubscriptionsQuery {
                customer_id: CustomerId::new(),
            })
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
