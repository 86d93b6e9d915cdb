//! StartCheckoutHandler - outbound subscription intent.
//!
//! Verifies the customer and plan, encodes the correlation reference, and
//! asks the provider for a preapproval. The returned init point is where
//! the customer authorizes the recurring payment; the webhook completes the
//! flow once the provider reports the preapproval authorized.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::CustomerId;
use crate::domain::membership::{ExternalReference, PlanTier, SubscriptionError};
use crate::ports::{CreatePreapprovalRequest, CustomerDirectory, MembershipRepository, PaymentProvider};

/// Command to start a subscription checkout.
#[derive(Debug, Clone)]
pub struct StartCheckoutCommand {
    pub customer_id: CustomerId,
    pub membership_id: PlanTier,
}

/// Checkout hand-off for the customer.
#[derive(Debug, Clone)]
pub struct StartCheckoutResult {
    /// Provider's preapproval id, for client-side status polling.
    pub preapproval_id: String,

    /// URL the customer visits to authorize the recurring payment.
    pub init_point: String,
}

/// Handler for subscription checkout intents.
pub struct StartCheckoutHandler {
    customers: Arc<dyn CustomerDirectory>,
    plans: Arc<dyn MembershipRepository>,
    provider: Arc<dyn PaymentProvider>,

    /// Where the provider sends the customer after checkout.
    back_url: String,
}

impl StartCheckoutHandler {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        plans: Arc<dyn MembershipRepository>,
        provider: Arc<dyn PaymentProvider>,
        back_url: String,
    ) -> Self {
        Self {
            customers,
            plans,
            provider,
            back_url,
        }
    }

    pub async fn handle(
        &self,
        cmd: StartCheckoutCommand,
    ) -> Result<StartCheckoutResult, SubscriptionError> {
        if !self.customers.exists(&cmd.customer_id).await? {
            return Err(SubscriptionError::customer_not_found(cmd.customer_id));
        }

        let plan = self
            .plans
            .find_by_tier(cmd.membership_id)
            .await?
            .ok_or(SubscriptionError::membership_not_found(cmd.membership_id))?;

        let reference = ExternalReference::new(cmd.customer_id, cmd.membership_id);
        let session = self
            .provider
            .create_preapproval(CreatePreapprovalRequest {
                reason: format!("{} membership", plan.name),
                amount_cents: plan.price.cents(),
                external_reference: reference.encode(),
                back_url: self.back_url.clone(),
            })
            .await
            .map_err(|e| SubscriptionError::payment_failed(e.to_string()))?;

        info!(
            customer_id = %cmd.customer_id,
            preapproval_id = %session.preapproval_id,
            tier = %cmd.membership_id,
            "checkout session created"
        );

        Ok(StartCheckoutResult {
            preapproval_id: session.preapproval_id,
            init_point: session.init_point,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCustomerDirectory, InMemoryMembershipRepository};
    use crate::adapters::provider::MockPaymentProvider;
    use crate::ports::{CheckoutSession, PaymentError};

    struct Fixture {
        provider: MockPaymentProvider,
        handler: StartCheckoutHandler,
        customer_id: CustomerId,
    }

    fn fixture() -> Fixture {
        let provider = MockPaymentProvider::new();
        let customers = Arc::new(InMemoryCustomerDirectory::new());
        let plans = Arc::new(InMemoryMembershipRepository::seeded());

        let customer_id = CustomerId::new();
        customers.register(customer_id);

        let handler = StartCheckoutHandler::new(
            customers,
            plans,
            Arc::new(provider.clone()),
            "https://store.test/membership/return".to_string(),
        );

        Fixture {
            provider,
            handler,
            customer_id,
        }
    }

    #[tokio::test]
    async fn checkout_returns_the_provider_init_point() {
        let f = fixture();
        f.provider.set_next_checkout(CheckoutSession {
            preapproval_id: "pre-55".to_string(),
            init_point: "https://provider.test/checkout/pre-55".to_string(),
        });

        let result = f
            .handler
            .handle(StartCheckoutCommand {
                customer_id: f.customer_id,
                membership_id: PlanTier::Elite,
            })
            .await
            .unwrap();

        assert_eq!(result.preapproval_id, "pre-55");
        assert_eq!(result.init_point, "https://provider.test/checkout/pre-55");
    }

    #[tokio::test]
    async fn reference_embedded_in_the_request_round_trips() {
        let f = fixture();

        f.handler
            .handle(StartCheckoutCommand {
                customer_id: f.customer_id,
                membership_id: PlanTier::Premium,
            })
            .await
            .unwrap();

        let calls = f.provider.calls();
        assert_eq!(calls.len(), 1);
        let raw = calls[0].strip_prefix("create_preapproval:").unwrap();
        let decoded = ExternalReference::decode(raw).unwrap();
        assert_eq!(decoded.customer_id, f.customer_id);
        assert_eq!(decoded.membership_id, PlanTier::Premium);
    }

    #[tokio::test]
    async fn unknown_customer_never_reaches_the_provider() {
        let f = fixture();

        let err = f
            .handler
            .handle(StartCheckoutCommand {
                customer_id: CustomerId::new(),
                membership_id: PlanTier::Premium,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::CustomerNotFound(_)));
        assert!(f.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_maps_to_payment_error() {
        let f = fixture();
        f.provider
            .set_next_error(PaymentError::Request("down".to_string()));

        let err = f
            .handler
            .handle(StartCheckoutCommand {
                customer_id: f.customer_id,
                membership_id: PlanTier::Essential,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::PaymentFailed { .. }));
    }
}
