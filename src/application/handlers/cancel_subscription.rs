//! CancelSubscriptionHandler - customer-initiated cancellation.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{CustomerId, SubscriptionId};
use crate::domain::membership::{Subscription, SubscriptionError};
use crate::ports::SubscriptionStore;

/// Command to cancel a subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub customer_id: CustomerId,
    pub subscription_id: SubscriptionId,
}

/// Handler for subscription cancellation.
pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionStore>,
}

impl CancelSubscriptionHandler {
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>) -> Self {
        Self { subscriptions }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<Subscription, SubscriptionError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or_else(|| {
                SubscriptionError::subscription_not_found(cmd.subscription_id.to_string())
            })?;

        // Another customer's subscription looks the same as a missing one.
        if subscription.customer_id != cmd.customer_id {
            return Err(SubscriptionError::subscription_not_found(
                cmd.subscription_id.to_string(),
            ));
        }

        subscription.cancel()?;
        self.subscriptions
            .update_status(&subscription.id, subscription.status)
            .await?;

        info!(
            subscription_id = %subscription.id,
            customer_id = %cmd.customer_id,
            "subscription cancelled"
        );
        Ok(subscription)
    }
}
