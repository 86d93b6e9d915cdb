//! PostgreSQL adapter implementations.
//!
//! sqlx-backed implementations of the persistence ports. The subscription
//! store relies on the `subscriptions_external_id_key` unique index to make
//! the webhook-idempotency check atomic with the insert.

mod customer_directory;
mod membership_repository;
mod subscription_linker;
mod subscription_store;

pub use customer_directory::PostgresCustomerDirectory;
pub use membership_repository::PostgresMembershipRepository;
pub use subscription_linker::PostgresSubscriptionLinker;
pub use subscription_store::PostgresSubscriptionStore;
