//! In-memory implementation of CustomerDirectory.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError, ErrorCode};
use crate::ports::CustomerDirectory;

/// Mutex-guarded set of known customer identities.
pub struct InMemoryCustomerDirectory {
    customers: Mutex<HashSet<CustomerId>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashSet::new()),
        }
    }

    /// Registers a customer identity.
    pub fn register(&self, customer_id: CustomerId) {
        if let Ok(mut customers) = self.customers.lock() {
            customers.insert(customer_id);
        }
    }
}

impl Default for InMemoryCustomerDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn exists(&self, customer_id: &CustomerId) -> Result<bool, DomainError> {
        let customers = self
            .customers
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "customer lock poisoned"))?;
        Ok(customers.contains(customer_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn registered_customer_exists() {
        let directory = InMemoryCustomerDirectory::new();
        let id = CustomerId::new();
        directory.register(id);
        assert!(directory.exists(&id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_customer_does_not_exist() {
        let directory = InMemoryCustomerDirectory::new();
        assert!(!directory.exists(&CustomerId::new()).await.unwrap());
    }
}
