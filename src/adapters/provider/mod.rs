//! Payment provider adapters.
//!
//! - `HttpPaymentProvider` - reqwest client for the provider's REST API
//! - `MockPaymentProvider` - configurable mock for tests

mod http_client;
mod mock_provider;

pub use http_client::{HttpPaymentProvider, ProviderConfig};
pub use mock_provider::MockPaymentProvider;
