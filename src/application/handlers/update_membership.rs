//! UpdateMembershipHandler - partial plan updates with snapshot rollback.
//!
//! Validation happens before any mutation. The pre-update state is captured
//! and returned so a larger composition can restore it verbatim if a
//! downstream step fails. Plan price edits never touch existing
//! subscription price snapshots; those live on the subscription rows.

use std::sync::Arc;

use crate::domain::foundation::{Money, Timestamp};
use crate::domain::membership::{Membership, MembershipPatch, PlanTier, SubscriptionError};
use crate::ports::MembershipRepository;

/// Command to partially update a membership plan.
#[derive(Debug, Clone)]
pub struct UpdateMembershipCommand {
    pub id: PlanTier,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
}

/// Result of a plan update.
#[derive(Debug, Clone)]
pub struct UpdateMembershipResult {
    /// The plan as persisted after the update.
    pub plan: Membership,

    /// Pre-update state, captured for compensation.
    pub snapshot: Membership,
}

/// Handler for membership plan updates.
pub struct UpdateMembershipHandler {
    plans: Arc<dyn MembershipRepository>,
}

impl UpdateMembershipHandler {
    pub fn new(plans: Arc<dyn MembershipRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(
        &self,
        cmd: UpdateMembershipCommand,
    ) -> Result<UpdateMembershipResult, SubscriptionError> {
        let patch = MembershipPatch {
            name: cmd.name,
            description: cmd.description,
            price: cmd.price,
        };

        // Reject disallowed plan names before any row is touched.
        patch.validate()?;

        let mut plan = self
            .plans
            .find_by_tier(cmd.id)
            .await?
            .ok_or(SubscriptionError::membership_not_found(cmd.id))?;

        let snapshot = plan.clone();
        plan.apply(&patch, Timestamp::now());
        self.plans.update(&plan).await?;

        Ok(UpdateMembershipResult { plan, snapshot })
    }

    /// Compensation: restores the captured pre-update state verbatim.
    pub async fn rollback(&self, snapshot: &Membership) -> Result<(), SubscriptionError> {
        let mut plan = self
            .plans
            .find_by_tier(snapshot.tier)
            .await?
            .ok_or(SubscriptionError::membership_not_found(snapshot.tier))?;

        plan.restore(snapshot, Timestamp::now());
        self.plans.update(&plan).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMembershipRepository;

    fn handler_with_seeded_plans() -> (Arc<InMemoryMembershipRepository>, UpdateMembershipHandler) {
        let plans = Arc::new(InMemoryMembershipRepository::seeded());
        let handler = UpdateMembershipHandler::new(plans.clone());
        (plans, handler)
    }

    #[tokio::test]
    async fn updates_only_supplied_fields() {
        let (plans, handler) = handler_with_seeded_plans();

        let result = handler
            .handle(UpdateMembershipCommand {
                id: PlanTier::Essential,
                name: None,
                description: Some("New copy".to_string()),
                price: None,
            })
            .await
            .unwrap();

        assert_eq!(result.plan.description, "New copy");
        assert_eq!(result.plan.price, result.snapshot.price);

        let stored = plans
            .find_by_tier(PlanTier::Essential)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.description, "New copy");
    }

    #[tokio::test]
    async fn disallowed_name_is_rejected_before_mutation() {
        let (plans, handler) = handler_with_seeded_plans();
        let before = plans
            .find_by_tier(PlanTier::Premium)
            .await
            .unwrap()
            .unwrap();

        let err = handler
            .handle(UpdateMembershipCommand {
                id: PlanTier::Premium,
                name: Some("platinum".to_string()),
                description: Some("should not land".to_string()),
                price: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::ValidationFailed { .. }));
        let after = plans
            .find_by_tier(PlanTier::Premium)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn unknown_tier_reports_not_found() {
        let plans = Arc::new(InMemoryMembershipRepository::new());
        let handler = UpdateMembershipHandler::new(plans);

        let err = handler
            .handle(UpdateMembershipCommand {
                id: PlanTier::Elite,
                name: None,
                description: None,
                price: Some(Money::from_cents(100).unwrap()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::MembershipNotFound(_)));
    }

    #[tokio::test]
    async fn rollback_restores_captured_state_verbatim() {
        let (plans, handler) = handler_with_seeded_plans();

        let result = handler
            .handle(UpdateMembershipCommand {
                id: PlanTier::Elite,
                name: None,
                description: Some("changed".to_string()),
                price: Some(Money::from_cents(19990).unwrap()),
            })
            .await
            .unwrap();

        handler.rollback(&result.snapshot).await.unwrap();

        let stored = plans.find_by_tier(PlanTier::Elite).await.unwrap().unwrap();
        assert_eq!(stored.name, result.snapshot.name);
        assert_eq!(stored.description, result.snapshot.description);
        assert_eq!(stored.price, result.snapshot.price);
    }
}
