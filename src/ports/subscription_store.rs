//! Subscription store port.
//!
//! # Design
//!
//! - **Atomic idempotency**: `insert` must enforce uniqueness of
//!   `external_id` at the storage layer and report a conflict as
//!   [`InsertOutcome::AlreadyExists`], never as an error. Concurrent webhook
//!   deliveries for the same provider id race on this insert; exactly one
//!   wins.
//! - **No hard deletes** in normal operation; `delete` exists only for the
//!   creation saga's compensation path.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError, SubscriptionId};
use crate::domain::membership::{Subscription, SubscriptionStatus};

/// Result of an insert attempt keyed on `external_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was inserted.
    Inserted,

    /// A subscription with this `external_id` already exists; nothing was
    /// written.
    AlreadyExists,
}

/// Persistence port for subscription rows.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a new subscription.
    ///
    /// Implementations must make the external-id uniqueness check atomic
    /// with the write (unique index or equivalent), not a read-then-write.
    async fn insert(&self, subscription: &Subscription) -> Result<InsertOutcome, DomainError>;

    /// Remove a subscription row. Compensation only.
    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Find the subscription correlated to a provider preapproval id.
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Fetch subscriptions by id, for the link-path read.
    async fn find_by_ids(
        &self,
        ids: &[SubscriptionId],
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Full scan filtered by the subscription's own `customer_id` field.
    ///
    /// Fallback read path for subscriptions whose link record is missing.
    async fn scan_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// All subscriptions, for the analytics fold.
    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError>;

    /// Persist a status change.
    async fn update_status(
        &self,
        id: &SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError>;
}
