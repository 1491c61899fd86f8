//! OAuth 2.0 client-credentials token lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  Single-flight refresh before expiry
//! └────────┬────────┘
//!          │
//!          ├──► TokenExchanger  (client-credentials grant over HTTP)
//!          │
//!          └──► TokenStore      (current bearer token + persistence)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: `TokenResponse` and `BearerToken`
//! - **[`traits`]**: `TokenExchanger` and `TokenStore` seams
//! - **[`token_manager`]**: Expiry check and refresh orchestration

pub mod token_manager;
pub mod traits;
pub mod types;

pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::{ExchangeError, TokenExchanger, TokenStore};
pub use types::{BearerToken, TokenResponse};
