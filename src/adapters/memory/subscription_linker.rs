//! In-memory implementation of SubscriptionLinker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::membership::CustomerSubscriptionLink;
use crate::ports::SubscriptionLinker;

/// Mutex-guarded vector of link rows with a fault-injection switch.
///
/// `fail_creates` makes every `create` call fail, which is how the test
/// suites exercise the saga's link-failure policy.
pub struct InMemorySubscriptionLinker {
    links: Mutex<Vec<CustomerSubscriptionLink>>,
    fail_creates: AtomicBool,
}

impl InMemorySubscriptionLinker {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            fail_creates: AtomicBool::new(false),
        }
    }

    /// Makes subsequent `create` calls fail.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of stored link rows.
    pub fn len(&self) -> usize {
        self.links.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<CustomerSubscriptionLink>>, DomainError> {
        self.links
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "link lock poisoned"))
    }
}

impl Default for InMemorySubscriptionLinker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionLinker for InMemorySubscriptionLinker {
    async fn create(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::LinkCreationFailed,
                "link creation disabled by fault injection",
            ));
        }
        self.lock()?.push(link.clone());
        Ok(())
    }

    async fn dismiss(&self, link: &CustomerSubscriptionLink) -> Result<(), DomainError> {
        let mut links = self.lock()?;
        let before = links.len();
        links.retain(|l| l.id != link.id);
        if links.len() == before {
            return Err(DomainError::new(
                ErrorCode::LinkNotFound,
                format!("no link {}", link.id),
            ));
        }
        Ok(())
    }

    async fn subscription_ids_for(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<SubscriptionId>, DomainError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|l| &l.customer_id == customer_id)
            .map(|l| l.subscription_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_query_returns_the_subscription_id() {
        let linker = InMemorySubscriptionLinker::new();
        let link = CustomerSubscriptionLink::new(CustomerId::new(), SubscriptionId::new());

        linker.create(&link).await.unwrap();

        let ids = linker.subscription_ids_for(&link.customer_id).await.unwrap();
        assert_eq!(ids, vec![link.subscription_id]);
    }

    #[tokio::test]
    async fn dismiss_removes_the_link() {
        let linker = InMemorySubscriptionLinker::new();
        let link = CustomerSubscriptionLink::new(CustomerId::new(), SubscriptionId::new());
        linker.create(&link).await.unwrap();

        linker.dismiss(&link).await.unwrap();

        assert!(linker.is_empty());
    }

    #[tokio::test]
    async fn fault_injection_fails_creates() {
        let linker = InMemorySubscriptionLinker::new();
        linker.fail_creates(true);

        let link = CustomerSubscriptionLink::new(CustomerId::new(), SubscriptionId::new());
        assert!(linker.create(&link).await.is_err());
        assert!(linker.is_empty());
    }

    #[tokio::test]
    async fn duplicate_pairs_are_not_deduplicated() {
        let linker = InMemorySubscriptionLinker::new();
        let customer_id = CustomerId::new();
        let subscription_id = SubscriptionId::new();

        linker
            .create(&CustomerSubscriptionLink::new(customer_id, subscription_id))
            .await
            .unwrap();
        linker
            .create(&CustomerSubscriptionLink::new(customer_id, subscription_id))
            .await
            .unwrap();

        assert_eq!(linker.len(), 2);
    }
}
