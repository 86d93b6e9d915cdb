//! ListMembershipsHandler - the public plan catalogue.

use std::sync::Arc;

use crate::domain::membership::{Membership, SubscriptionError};
use crate::ports::MembershipRepository;

/// Handler for listing all membership plans.
pub struct ListMembershipsHandler {
    plans: Arc<dyn MembershipRepository>,
}

impl ListMembershipsHandler {
    pub fn new(plans: Arc<dyn MembershipRepository>) -> Self {
        Self { plans }
    }

    pub async fn handle(&self) -> Result<Vec<Membership>, SubscriptionError> {
        Ok(self.plans.list_all().await?)
    }
}
