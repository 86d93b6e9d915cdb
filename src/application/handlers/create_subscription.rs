//! CreateSubscriptionHandler - the subscription creation saga.
//!
//! Runs the ordered steps: verify customer, fetch plan, persist an active
//! subscription with a price snapshot, create the customer-subscription
//! link. Mutating steps carry compensations that run in reverse order when
//! a later step fails fatally.

use std::sync::{Arc, Mutex};

use crate::domain::foundation::{CustomerId, SubscriptionId, Timestamp};
use crate::domain::membership::{
    CustomerSubscriptionLink, PlanTier, Subscription, SubscriptionError,
};
use crate::domain::saga::{FailurePolicy, Saga, SagaStep};
use crate::ports::{
    CustomerDirectory, InsertOutcome, MembershipRepository, SubscriptionLinker, SubscriptionStore,
};

/// Policy applied when the link-creation step fails.
///
/// `Tolerate`: the subscription stays in place without a link, the failure
/// is surfaced as a named, monitorable condition, and the fallback
/// customer-id scan keeps the subscription discoverable. Flip to `Abort`
/// for strict atomicity (the subscription is rolled back with the link).
pub const LINK_FAILURE_POLICY: FailurePolicy = FailurePolicy::Tolerate;

/// Command to create a subscription.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub customer_id: CustomerId,

    /// The provider's preapproval id.
    pub external_id: String,

    pub membership_id: PlanTier,

    /// Next renewal / expiry boundary, provider-supplied.
    pub ended_at: Option<Timestamp>,
}

/// Result of a successful creation saga.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionResult {
    /// The persisted subscription. The link is not returned.
    pub subscription: Subscription,

    /// Set when link creation failed and the failure was tolerated.
    pub link_failure: Option<String>,
}

/// Handler for the subscription creation saga.
pub struct CreateSubscriptionHandler {
    customers: Arc<dyn CustomerDirectory>,
    plans: Arc<dyn MembershipRepository>,
    subscriptions: Arc<dyn SubscriptionStore>,
    linker: Arc<dyn SubscriptionLinker>,
}

impl CreateSubscriptionHandler {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        plans: Arc<dyn MembershipRepository>,
        subscriptions: Arc<dyn SubscriptionStore>,
        linker: Arc<dyn SubscriptionLinker>,
    ) -> Self {
        Self {
            customers,
            plans,
            subscriptions,
            linker,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, SubscriptionError> {
        // Slots carry values produced by one step into later steps and
        // compensations.
        let price_slot = Arc::new(Mutex::new(None));
        let subscription_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let link_slot: Arc<Mutex<Option<CustomerSubscriptionLink>>> = Arc::new(Mutex::new(None));

        // Step 1: read-only existence check. Nothing to compensate.
        let verify_customer = {
            let customers = self.customers.clone();
            let customer_id = cmd.customer_id;
            SagaStep::new("verify-customer", move || async move {
                if customers.exists(&customer_id).await? {
                    Ok(())
                } else {
                    Err(SubscriptionError::customer_not_found(customer_id))
                }
            })
        };

        // Step 2: read-only plan fetch; stashes the price for the snapshot.
        let fetch_plan = {
            let plans = self.plans.clone();
            let tier = cmd.membership_id;
            let price_slot = price_slot.clone();
            SagaStep::new("fetch-plan", move || async move {
                let plan = plans
                    .find_by_tier(tier)
                    .await?
                    .ok_or(SubscriptionError::membership_not_found(tier))?;
                *price_slot
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("price slot poisoned"))? =
                    Some(plan.price);
                Ok(())
            })
        };

        // Step 3: persist the subscription. The store's atomic external-id
        // check turns duplicate deliveries into AlreadyExists, which aborts
        // here before anything was written.
        let persist_subscription = {
            let store = self.subscriptions.clone();
            let price_slot = price_slot.clone();
            let subscription_slot = subscription_slot.clone();
            let customer_id = cmd.customer_id;
            let external_id = cmd.external_id.clone();
            let tier = cmd.membership_id;
            let ended_at = cmd.ended_at;

            let delete_store = self.subscriptions.clone();
            let delete_slot = subscription_slot.clone();

            SagaStep::new("persist-subscription", move || async move {
                let price = price_slot
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("price slot poisoned"))?
                    .ok_or_else(|| SubscriptionError::infrastructure("plan price not fetched"))?;
                let subscription = Subscription::activate(
                    customer_id,
                    external_id,
                    tier,
                    price,
                    Timestamp::now(),
                    ended_at,
                );
                match store.insert(&subscription).await? {
                    InsertOutcome::Inserted => {
                        *subscription_slot.lock().map_err(|_| {
                            SubscriptionError::infrastructure("subscription slot poisoned")
                        })? = Some(subscription);
                        Ok(())
                    }
                    InsertOutcome::AlreadyExists => Err(SubscriptionError::duplicate_external_id(
                        subscription.external_id.clone(),
                    )),
                }
            })
            .with_compensation(move || async move {
                let id: Option<SubscriptionId> = delete_slot
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("subscription slot poisoned"))?
                    .as_ref()
                    .map(|s| s.id);
                if let Some(id) = id {
                    delete_store.delete(&id).await?;
                }
                Ok(())
            })
        };

        // Step 4: create the link. Failure handling follows the explicit
        // policy constant above.
        let create_link = {
            let linker = self.linker.clone();
            let subscription_slot = subscription_slot.clone();
            let link_slot_write = link_slot.clone();
            let customer_id = cmd.customer_id;

            let dismiss_linker = self.linker.clone();
            let dismiss_slot = link_slot.clone();

            let mut step = SagaStep::new("create-link", move || async move {
                let subscription_id = subscription_slot
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("subscription slot poisoned"))?
                    .as_ref()
                    .map(|s| s.id)
                    .ok_or_else(|| {
                        SubscriptionError::infrastructure("subscription not persisted")
                    })?;
                let link = CustomerSubscriptionLink::new(customer_id, subscription_id);
                linker
                    .create(&link)
                    .await
                    .map_err(|e| SubscriptionError::link_creation_failed(e.to_string()))?;
                *link_slot_write
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("link slot poisoned"))? =
                    Some(link);
                Ok(())
            })
            .with_compensation(move || async move {
                let link = dismiss_slot
                    .lock()
                    .map_err(|_| SubscriptionError::infrastructure("link slot poisoned"))?
                    .clone();
                if let Some(link) = link {
                    dismiss_linker.dismiss(&link).await?;
                }
                Ok(())
            });
            if matches!(LINK_FAILURE_POLICY, FailurePolicy::Tolerate) {
                step = step.tolerate_failure();
            }
            step
        };

        let report = Saga::new("create-subscription")
            .step(verify_customer)
            .step(fetch_plan)
            .step(persist_subscription)
            .step(create_link)
            .run()
            .await
            .map_err(|e| e.source)?;

        let subscription = subscription_slot
            .lock()
            .map_err(|_| SubscriptionError::infrastructure("subscription slot poisoned"))?
            .take()
            .ok_or_else(|| {
                SubscriptionError::infrastructure("saga completed without a subscription")
            })?;

        let link_failure = report
            .tolerated
            .into_iter()
            .find(|t| t.step == "create-link")
            .map(|t| t.error.message());

        Ok(CreateSubscriptionResult {
            subscription,
            link_failure,
        })
    }
}
