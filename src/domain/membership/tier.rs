//! Membership plan tier definitions.
//!
//! Represents the closed set of plan tiers the store sells.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Membership plan tier.
///
/// The set is closed: plan updates may only rename a plan to one of these
/// three labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Entry-level plan.
    Essential,

    /// Mid-range plan.
    Premium,

    /// Top plan.
    Elite,
}

impl PlanTier {
    /// All known tiers, in ascending order of price positioning.
    pub const ALL: [PlanTier; 3] = [PlanTier::Essential, PlanTier::Premium, PlanTier::Elite];

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            PlanTier::Essential => "essential",
            PlanTier::Premium => "premium",
            PlanTier::Elite => "elite",
        }
    }

    /// Returns true if `name` belongs to the closed set of valid plan names.
    pub fn is_valid_name(name: &str) -> bool {
        Self::from_str(name).is_ok()
    }
}

impl FromStr for PlanTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "essential" => Ok(PlanTier::Essential),
            "premium" => Ok(PlanTier::Premium),
            "elite" => Ok(PlanTier::Elite),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
