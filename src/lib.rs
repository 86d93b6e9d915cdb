//! Club Backend - Subscription membership service for the online store.
//!
//! Keeps the authoritative local record of who is subscribed, at what price,
//! and for how long, reconciling asynchronous payment-provider notifications
//! against local subscription state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
