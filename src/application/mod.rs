//! Application layer - Commands, Queries, and Handlers.
//!
//! Orchestrates domain operations and coordinates between ports. Command
//! handlers (write) are separated from query handlers (read).

pub mod handlers;
