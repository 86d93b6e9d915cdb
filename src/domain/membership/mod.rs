//! Membership domain - plan tiers, subscriptions, and provider events.
//!
//! The store sells three membership plans. A customer subscribes to a plan
//! through the external payment provider; the local `Subscription` record is
//! the authoritative statement of who is subscribed, at what price, and for
//! how long.

mod errors;
mod external_reference;
mod link;
mod plan;
mod provider_event;
mod subscription;
mod tier;

pub use errors::SubscriptionError;
pub use external_reference::ExternalReference;
pub use link::CustomerSubscriptionLink;
pub use plan::{Membership, MembershipPatch};
pub use provider_event::{ProviderEvent, ProviderEventKind};
pub use subscription::{Subscription, SubscriptionStatus};
pub use tier::PlanTier;
