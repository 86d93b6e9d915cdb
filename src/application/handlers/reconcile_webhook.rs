//! ReconcileWebhookHandler - provider event reconciliation.
//!
//! The pushed payload is only trusted for the object id it carries. For
//! preapproval events the canonical object is fetched from the provider,
//! its embedded external reference decoded, and the creation saga run.
//! Duplicate deliveries resolve to a no-op; a malformed reference is
//! terminal because redelivery can never fix it.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::membership::{ExternalReference, ProviderEvent, ProviderEventKind, SubscriptionError};
use crate::ports::{PaymentProvider, PaymentStatus, PreapprovalStatus, SubscriptionStore};

use super::create_subscription::{CreateSubscriptionCommand, CreateSubscriptionHandler};

/// Command carrying a raw provider event envelope.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    pub event: ProviderEvent,
}

/// Terminal outcome of reconciling one event.
///
/// Every variant is an acknowledged delivery; the webhook endpoint returns
/// 200 for all of them. Failures that redelivery could fix surface as `Err`
/// from the handler instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// An authorized preapproval produced a new subscription.
    SubscriptionCreated {
        subscription_id: crate::domain::foundation::SubscriptionId,
        link_failure: Option<String>,
    },

    /// A subscription for this preapproval already exists.
    Duplicate { external_id: String },

    /// The external reference could not be decoded. Terminal.
    CorrelationFailed { reason: String },

    /// The preapproval is not in the authorized state; nothing to do yet.
    NotAuthorized { status: PreapprovalStatus },

    /// A payment event was observed and logged.
    PaymentObserved {
        payment_id: String,
        status: PaymentStatus,
    },

    /// A merchant order event was acknowledged without action.
    MerchantOrderAcknowledged { order_id: String },

    /// An event class this service does not act on.
    Ignored { event_type: String },
}

/// Handler for incoming payment provider webhooks.
pub struct ReconcileWebhookHandler {
    provider: Arc<dyn PaymentProvider>,
    subscriptions: Arc<dyn SubscriptionStore>,
    creator: Arc<CreateSubscriptionHandler>,
}

impl ReconcileWebhookHandler {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        subscriptions: Arc<dyn SubscriptionStore>,
        creator: Arc<CreateSubscriptionHandler>,
    ) -> Self {
        Self {
            provider,
            subscriptions,
            creator,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileWebhookCommand,
    ) -> Result<ReconcileOutcome, SubscriptionError> {
        match cmd.event.kind() {
            ProviderEventKind::Preapproval { preapproval_id } => {
                self.reconcile_preapproval(&preapproval_id).await
            }
            ProviderEventKind::Payment { payment_id } => self.observe_payment(&payment_id).await,
            ProviderEventKind::MerchantOrder { order_id } => {
                info!(order_id = %order_id, "merchant order event acknowledged");
                Ok(ReconcileOutcome::MerchantOrderAcknowledged { order_id })
            }
            ProviderEventKind::Unknown { event_type } => {
                info!(event_type = %event_type, "ignoring unhandled provider event type");
                Ok(ReconcileOutcome::Ignored { event_type })
            }
        }
    }

    async fn reconcile_preapproval(
        &self,
        preapproval_id: &str,
    ) -> Result<ReconcileOutcome, SubscriptionError> {
        // Cheap pre-check that skips the provider round-trip on redelivery.
        // The store's atomic insert remains the real guard for races.
        if self
            .subscriptions
            .find_by_external_id(preapproval_id)
            .await?
            .is_some()
        {
            info!(preapproval_id = %preapproval_id, "preapproval already reconciled");
            return Ok(ReconcileOutcome::Duplicate {
                external_id: preapproval_id.to_string(),
            });
        }

        let preapproval = self
            .provider
            .fetch_preapproval(preapproval_id)
            .await
            .map_err(|e| SubscriptionError::payment_failed(e.to_string()))?;

        if preapproval.status != PreapprovalStatus::Authorized {
            info!(
                preapproval_id = %preapproval.id,
                status = ?preapproval.status,
                "preapproval not authorized; no action taken"
            );
            return Ok(ReconcileOutcome::NotAuthorized {
                status: preapproval.status,
            });
        }

        let reference = match ExternalReference::decode(&preapproval.external_reference) {
            Ok(reference) => reference,
            Err(e) => {
                // Redelivery carries the same reference; retrying is useless.
                warn!(
                    preapproval_id = %preapproval.id,
                    error = %e,
                    "external reference could not be correlated"
                );
                return Ok(ReconcileOutcome::CorrelationFailed {
                    reason: e.message(),
                });
            }
        };

        let created = self
            .creator
            .handle(CreateSubscriptionCommand {
                customer_id: reference.customer_id,
                external_id: preapproval.id.clone(),
                membership_id: reference.membership_id,
                ended_at: preapproval.end_date,
            })
            .await;

        match created {
            Ok(result) => {
                info!(
                    subscription_id = %result.subscription.id,
                    preapproval_id = %preapproval.id,
                    "subscription created from preapproval"
                );
                Ok(ReconcileOutcome::SubscriptionCreated {
                    subscription_id: result.subscription.id,
                    link_failure: result.link_failure,
                })
            }
            // Lost the insert race to a concurrent delivery.
            Err(SubscriptionError::DuplicateExternalId(external_id)) => {
                info!(external_id = %external_id, "concurrent delivery already reconciled");
                Ok(ReconcileOutcome::Duplicate { external_id })
            }
            Err(e) => Err(e),
        }
    }

    async fn observe_payment(&self, payment_id: &str) -> Result<ReconcileOutcome, SubscriptionError> {
        let payment = self
            .provider
            .fetch_payment(payment_id)
            .await
            .map_err(|e| SubscriptionError::payment_failed(e.to_string()))?;

        info!(
            payment_id = %payment.id,
            status = ?payment.status,
            "payment event observed"
        );
        Ok(ReconcileOutcome::PaymentObserved {
            payment_id: payment.id,
            status: payment.status,
        })
    }
}
