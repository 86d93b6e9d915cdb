//! HTTP surface for the membership module.

mod dto;
mod handlers;
mod routes;

pub use dto::ErrorResponse;
pub use handlers::{AuthenticatedCustomer, MembershipApiError, MembershipAppState};
pub use routes::membership_router;
