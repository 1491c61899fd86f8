//! Traits for the token exchange and token storage seams
//!
//! These traits enable dependency injection and testing by abstracting
//! the authorization server and the credential persistence.

use async_trait::async_trait;
use chrono::Duration;
use thiserror::Error;

use super::types::{BearerToken, TokenResponse};

/// Failure of a client-credentials exchange
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
    /// The authorization server answered with a non-success status
    #[error("token endpoint returned HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The request never produced a response
    #[error("token request failed: {0}")]
    Transport(String),

    /// The response body is not a valid token response
    #[error("invalid token response: {0}")]
    InvalidResponse(String),
}

/// Performs the OAuth 2.0 client-credentials grant
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Request a fresh access token.
    ///
    /// # Errors
    /// Returns [`ExchangeError`] if the exchange fails for any reason.
    async fn exchange(&self) -> Result<TokenResponse, ExchangeError>;
}

/// Holds the current bearer token
///
/// Implementations must make `replace` atomic: readers observe either the
/// old token or the new one, never a mix.
pub trait TokenStore: Send + Sync {
    /// Snapshot of the current token.
    fn current(&self) -> BearerToken;

    /// Whether the current token is expired or expires within `margin`.
    fn is_expired(&self, margin: Duration) -> bool {
        self.current().is_expired(margin)
    }

    /// Install the token granted by `response` and return it.
    ///
    /// Persistence, if any, is best-effort and must not fail the call.
    fn replace(&self, response: &TokenResponse) -> BearerToken;
}
