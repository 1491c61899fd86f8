//! Resilience patterns for outbound calls
//!
//! - **Rate Limiter**: enforces a minimum interval between consecutive
//!   dispatches so a remote API's request quota is never exceeded

pub mod rate_limiter;

pub use rate_limiter::{RateLimiter, RateLimiterConfig};
