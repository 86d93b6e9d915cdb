//! In-memory implementation of MembershipRepository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, Money, Timestamp};
use crate::domain::membership::{Membership, PlanTier};
use crate::ports::MembershipRepository;

/// Mutex-guarded map of plan rows keyed by tier.
pub struct InMemoryMembershipRepository {
    plans: Mutex<HashMap<PlanTier, Membership>>,
}

impl InMemoryMembershipRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a repository seeded with the three standard plans.
    pub fn seeded() -> Self {
        let repo = Self::new();
        {
            let mut plans = repo.plans.lock().expect("plan map lock");
            for (tier, cents, description) in [
                (PlanTier::Essential, 2990, "Entry-level membership"),
                (PlanTier::Premium, 4990, "Mid-range membership"),
                (PlanTier::Elite, 9990, "Top membership"),
            ] {
                plans.insert(
                    tier,
                    Membership {
                        tier,
                        name: tier.display_name().to_string(),
                        description: description.to_string(),
                        price: Money::from_cents(cents).expect("seed price is non-negative"),
                        updated_at: Timestamp::now(),
                    },
                );
            }
        }
        repo
    }

    /// Inserts or replaces a plan row.
    pub fn put(&self, plan: Membership) {
        self.plans
            .lock()
            .expect("plan map lock")
            .insert(plan.tier, plan);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<PlanTier, Membership>>, DomainError> {
        self.plans
            .lock()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "plan map lock poisoned"))
    }
}

impl Default for InMemoryMembershipRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn find_by_tier(&self, tier: PlanTier) -> Result<Option<Membership>, DomainError> {
        Ok(self.lock()?.get(&tier).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Membership>, DomainError> {
        let plans = self.lock()?;
        // Catalogue order follows the tier ordering, not map iteration order.
        Ok(PlanTier::ALL
            .iter()
            .filter_map(|tier| plans.get(tier).cloned())
            .collect())
    }

    async fn update(&self, plan: &Membership) -> Result<(), DomainError> {
        let mut plans = self.lock()?;
        if !plans.contains_key(&plan.tier) {
            return Err(DomainError::new(
                ErrorCode::MembershipNotFound,
                format!("no plan for tier {}", plan.tier),
            ));
        }
        plans.insert(plan.tier, plan.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_repository_holds_three_plans() {
        let repo = InMemoryMembershipRepository::seeded();
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn update_replaces_the_stored_row() {
        let repo = InMemoryMembershipRepository::seeded();
        let mut plan = repo
            .find_by_tier(PlanTier::Premium)
            .await
            .unwrap()
            .unwrap();
        plan.price = Money::from_cents(5990).unwrap();

        repo.update(&plan).await.unwrap();

        let stored = repo
            .find_by_tier(PlanTier::Premium)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.price.cents(), 5990);
    }

    #[tokio::test]
    async fn update_of_missing_plan_fails() {
        let repo = InMemoryMembershipRepository::new();
        let plan = Membership {
            tier: PlanTier::Elite,
            name: "elite".to_string(),
            description: String::new(),
            price: Money::ZERO,
            updated_at: Timestamp::now(),
        };
        assert!(repo.update(&plan).await.is_err());
    }
}
