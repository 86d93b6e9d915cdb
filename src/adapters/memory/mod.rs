//! In-memory adapter implementations.
//!
//! Back the ports with plain mutex-guarded collections. Used by the test
//! suites and by local development without a database. The subscription
//! store performs its external-id uniqueness check inside the lock, so the
//! insert is atomic the same way the unique index makes it in Postgres.

mod customer_directory;
mod membership_repository;
mod subscription_linker;
mod subscription_store;

pub use customer_directory::InMemoryCustomerDirectory;
pub use membership_repository::InMemoryMembershipRepository;
pub use subscription_linker::InMemorySubscriptionLinker;
pub use subscription_store::InMemorySubscriptionStore;
