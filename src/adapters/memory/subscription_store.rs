//! In-memory implementation of SubscriptionStore.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::membership::{Subscription, SubscriptionStatus};
use crate::ports::{InsertOutcome, SubscriptionStore};

/// Mutex-guarded vector of subscription rows.
///
/// The external-id uniqueness check runs inside the lock, making the insert
/// atomic with respect to concurrent webhook deliveries in the same process.
pub struct InMemorySubscriptionStore {
    rows: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Subscription>>, DomainError> {
        self.rows
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "subscription lock poisoned"))
    }
}

impl Default for InMemorySubscriptionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert(&self, subscription: &Subscription) -> Result<InsertOutcome, DomainError> {
        let mut rows = self.lock()?;
        if rows
            .iter()
            .any(|r| r.external_id == subscription.external_id)
        {
            return Ok(InsertOutcome::AlreadyExists);
        }
        rows.push(subscription.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn delete(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let mut rows = self.lock()?;
        let before = rows.len();
        rows.retain(|r| &r.id != id);
        if rows.len() == before {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("no subscription {}", id),
            ));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.lock()?.iter().find(|r| &r.id == id).cloned())
    }

    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .lock()?
            .iter()
            .find(|r| r.external_id == external_id)
            .cloned())
    }

    async fn find_by_ids(
        &self,
        ids: &[SubscriptionId],
    ) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect())
    }

    async fn scan_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|r| &r.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Subscription>, DomainError> {
        Ok(self.lock()?.clone())
    }

    async fn update_status(
        &self,
        id: &SubscriptionId,
        status: SubscriptionStatus,
    ) -> Result<(), DomainError> {
        let mut rows = self.lock()?;
        match rows.iter_mut().find(|r| &r.id == id) {
            Some(row) => {
                row.status = status;
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("no subscription {}", id),
            )),
        }
    }
}
