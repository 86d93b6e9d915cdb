//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `membership` - Plan tiers, subscription lifecycle, provider events
//! - `saga` - Generic multi-step runner with reverse-order compensation

pub mod foundation;
pub mod membership;
pub mod saga;
