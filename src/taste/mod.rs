//! Integration with the external taste/recommendation search service.
//!
//! Layered leaf-first: the rate limiter paces outbound calls, the request
//! cache memoizes successful responses, the client normalizes raw results
//! into [`crate::models::Entity`] values, and the fan-out engine merges
//! multi-query result sets. Derived discovery operations compose these.

pub mod cache;
pub mod client;
pub mod discovery;
pub mod fanout;
pub mod rate_limit;

pub use client::{TasteClient, TasteError};
