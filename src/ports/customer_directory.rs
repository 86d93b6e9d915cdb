//! Customer directory port.
//!
//! Customer identity is owned by another part of the system; this service
//! only needs to verify that a customer exists before writing anything on
//! their behalf.

use async_trait::async_trait;

use crate::domain::foundation::{CustomerId, DomainError};

/// Read-only existence checks against the customer identity store.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Returns true if the customer identity exists.
    async fn exists(&self, customer_id: &CustomerId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_directory_is_object_safe() {
        fn _accepts_dyn(_directory: &dyn CustomerDirectory) {}
    }
}
