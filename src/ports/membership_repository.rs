//! Membership plan repository port.
//!
//! Plan rows are created at seed time and edited rarely, only through the
//! update workflow. Implementations must never touch subscription price
//! snapshots when a plan price changes.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::membership::{Membership, PlanTier};

/// Repository port for membership plan definitions.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find a plan by its tier. Returns `None` if not seeded.
    async fn find_by_tier(&self, tier: PlanTier) -> Result<Option<Membership>, DomainError>;

    /// List all seeded plans.
    async fn list_all(&self) -> Result<Vec<Membership>, DomainError>;

    /// Persist the given plan state over the existing row.
    async fn update(&self, plan: &Membership) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MembershipRepository) {}
    }
}
