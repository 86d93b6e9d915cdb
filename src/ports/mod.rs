//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.
//!
//! - `MembershipRepository` - plan definition CRUD
//! - `SubscriptionStore` - subscription persistence with an atomic
//!   external-id uniqueness guarantee
//! - `SubscriptionLinker` - customer-subscription association records
//! - `CustomerDirectory` - existence checks against the customer identity
//!   store (owned elsewhere)
//! - `PaymentProvider` - canonical-state fetches and preapproval creation

mod customer_directory;
mod membership_repository;
mod payment_provider;
mod subscription_linker;
mod subscription_store;

pub use customer_directory::CustomerDirectory;
pub use membership_repository::MembershipRepository;
pub use payment_provider::{
    CheckoutSession, CreatePreapprovalRequest, Payment, PaymentError, PaymentProvider,
    PaymentStatus, Preapproval, PreapprovalStatus,
};
pub use subscription_linker::SubscriptionLinker;
pub use subscription_store::{InsertOutcome, SubscriptionStore};
