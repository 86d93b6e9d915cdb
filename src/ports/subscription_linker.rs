//! Relationship linker port.
//!
//! Maintains the non-owning customer-subscription association records.
//! Creation is not idempotent on its own: calling `create` twice for the
//! same pair produces duplicate link rows, so callers must not retry
//! blindly.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError, SubscriptionId};
use crate::domain::membership::CustomerSubscriptionLink;

/// Port for customer-subscription association records.
#[async_trait]
pub trait SubscriptionLinker: Send + Sync {
    /// Insert an association record.
    async fn create(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError>;

    /// Remove an association record. Used only as compensation.
    async fn dismiss(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError>;

    /// Subscription ids linked to the given customer.
    ///
    /// This is the primary (graph) read path; callers fall back to the
    /// store's customer-id scan when it comes back empty.
    async fn subscription_ids_for(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionId>, DomainError>;
}
