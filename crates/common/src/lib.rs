//! Reusable building blocks shared across RosterLink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `runtime`: async infrastructure (resilience)
//! - `platform`: platform integrations (auth, storage)
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;
#[cfg(feature = "platform")]
pub mod storage;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{BearerToken, TokenManager, TokenManagerError, TokenResponse};
#[cfg(feature = "runtime")]
pub use resilience::RateLimiter;
#[cfg(feature = "platform")]
pub use storage::{PersistentConnection, SqlValue, StorageError, StorageResult};
