//! Toornament API access
//!
//! # Architecture
//!
//! ```text
//! ToornamentClient ──► RequestExecutor ──► TokenManager ──► ClientCredentialsExchanger
//!                         │    (paginate)                          │
//!                         └──────────────► Transport ◄─────────────┘
//!                                  (X-Api-Key, RateLimiter, HttpClient)
//! ```
//!
//! Every request, including the token exchange, goes through the shared
//! [`Transport`] and therefore through the same rate limiter.

pub mod client;
pub mod executor;
pub mod oauth;
pub mod pagination;
pub mod transport;

pub use client::ToornamentClient;
pub use executor::{RequestExecutor, ToornamentTokenManager};
pub use oauth::ClientCredentialsExchanger;
pub use pagination::ContentRange;
pub use transport::Transport;
