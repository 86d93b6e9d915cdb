//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum routes, DTOs, and handlers
//! - `postgres` - sqlx-backed persistence
//! - `memory` - in-memory persistence for tests and local development
//! - `provider` - payment provider client (HTTP) and mock

pub mod http;
pub mod memory;
pub mod postgres;
pub mod provider;
