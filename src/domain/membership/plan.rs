//! Membership plan definition.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, Timestamp};

use super::{PlanTier, SubscriptionError};

/// A membership plan the store sells.
///
/// `price` is the *current* price of the plan. Subscriptions snapshot the
/// price at creation time and are never affected by later plan edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Plan identity; one row exists per tier.
    pub tier: PlanTier,

    /// Display label; constrained to the closed set of plan names.
    pub name: String,

    /// Free-text marketing description.
    pub description: String,

    /// Current price of the plan.
    pub price: Money,

    pub updated_at: Timestamp,
}

/// Partial update to a membership plan.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct MembershipPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Money>,
}

impl MembershipPatch {
    /// Validates the patch before any mutation.
    ///
    /// A supplied `name` must belong to the closed set of plan names.
    pub fn validate(&self) -> Result<(), SubscriptionError> {
        if let Some(name) = &self.name {
            if !PlanTier::is_valid_name(name) {
                return Err(SubscriptionError::validation(
                    "name",
                    format!("'{}' is not a known plan name", name),
                ));
            }
        }
        Ok(())
    }

    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.price.is_none()
    }
}

impl Membership {
    /// Applies a validated partial update in place.
    pub fn apply(&mut self, patch: &MembershipPatch, now: Timestamp) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        self.updated_at = now;
    }

    /// Restores the fields captured in `snapshot` verbatim.
    ///
    /// Used as compensation when a later step in a larger composition fails.
    pub fn restore(&mut self, snapshot: &Membership, now: Timestamp) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.price = snapshot.price;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn premium_plan() -> Membership {
        Membership {
            tier: PlanTier::Premium,
            name: "premium".to_string(),
            description: "The mid-range plan".to_string(),
            price: Money::from_cents(4990).unwrap(),
            updated_at: Timestamp::now(),
        }
    }

    #[test]
    fn patch_with_known_name_validates() {
        let patch = MembershipPatch {
            name: Some("elite".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn patch_with_unknown_name_is_rejected() {
        let patch = MembershipPatch {
            name: Some("platinum".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn apply_changes_only_supplied_fields() {
        let mut plan = premium_plan();
        let patch = MembershipPatch {
            price: Some(Money::from_cents(5990).unwrap()),
            ..Default::default()
        };

        plan.apply(&patch, Timestamp::now());

        assert_eq!(plan.price.cents(), 5990);
        assert_eq!(plan.name, "premium");
        assert_eq!(plan.description, "The mid-range plan");
    }

    #[test]
    fn restore_puts_captured_fields_back_verbatim() {
        let original = premium_plan();
        let mut plan = original.clone();

        let patch = MembershipPatch {
            name: Some("elite".to_string()),
            description: Some("changed".to_string()),
            price: Some(Money::from_cents(1).unwrap()),
        };
        plan.apply(&patch, Timestamp::now());
        plan.restore(&original, Timestamp::now());

        assert_eq!(plan.name, original.name);
        assert_eq!(plan.description, original.description);
        assert_eq!(plan.price, original.price);
    }

    #[test]
    fn empty_patch_reports_empty() {
        assert!(MembershipPatch::default().is_empty());
    }
}
