//! HTTP adapter - axum routers, handlers, and DTOs.

pub mod membership;
