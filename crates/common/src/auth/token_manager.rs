//! Token manager with refresh-on-demand
//!
//! Manages the bearer token lifecycle:
//! - Expiry check against a safety margin (default 1 min)
//! - Client-credentials exchange when the token is (about to be) expired
//! - At most one exchange in flight; concurrent callers wait for it and
//!   then observe the refreshed token

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::traits::{ExchangeError, TokenExchanger, TokenStore};
use super::types::BearerToken;

/// Error type for token manager operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenManagerError {
    /// The client-credentials exchange failed
    ExchangeFailed(ExchangeError),
}

impl std::fmt::Display for TokenManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExchangeFailed(e) => write!(f, "Token refresh failed: {e}"),
        }
    }
}

impl std::error::Error for TokenManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ExchangeFailed(e) => Some(e),
        }
    }
}

impl From<ExchangeError> for TokenManagerError {
    fn from(err: ExchangeError) -> Self {
        Self::ExchangeFailed(err)
    }
}

/// Keeps the bearer token in a [`TokenStore`] valid
///
/// Exchange failures are returned to the caller and never retried here.
pub struct TokenManager<E: TokenExchanger + 'static, S: TokenStore + 'static> {
    exchanger: Arc<E>,
    store: Arc<S>,
    refresh_margin: Duration,
    refresh_lock: Mutex<()>,
    exchanges: AtomicU64,
}

impl<E: TokenExchanger + 'static, S: TokenStore + 'static> TokenManager<E, S> {
    /// Create a new token manager
    ///
    /// # Arguments
    /// * `exchanger` - Performs the client-credentials grant
    /// * `store` - Holds (and persists) the current token
    /// * `refresh_margin` - Treat tokens expiring within this window as
    ///   expired
    #[must_use]
    pub fn new(exchanger: Arc<E>, store: Arc<S>, refresh_margin: Duration) -> Self {
        Self { exchanger, store, refresh_margin, refresh_lock: Mutex::new(()), exchanges: AtomicU64::new(0) }
    }

    /// Return a token that is valid beyond the refresh margin
    ///
    /// Performs at most one exchange, even under concurrent callers: the
    /// expiry check is repeated after acquiring the refresh lock so callers
    /// that queued behind an exchange reuse its result.
    ///
    /// # Errors
    /// Returns [`TokenManagerError::ExchangeFailed`] if a needed exchange
    /// fails. The stored token is left untouched in that case.
    pub async fn ensure_valid(&self) -> Result<BearerToken, TokenManagerError> {
        if !self.store.is_expired(self.refresh_margin) {
            return Ok(self.store.current());
        }

        let _guard = self.refresh_lock.lock().await;

        if !self.store.is_expired(self.refresh_margin) {
            debug!("Token already refreshed by a concurrent caller");
            return Ok(self.store.current());
        }

        debug!("Bearer token expired or about to expire, exchanging client credentials");
        let response = self.exchanger.exchange().await.map_err(|err| {
            warn!(error = %err, "Client-credentials exchange failed");
            TokenManagerError::from(err)
        })?;

        self.exchanges.fetch_add(1, Ordering::Relaxed);
        let token = self.store.replace(&response);

        info!(
            expires_at = %token.expires_at,
            scope = %token.scope,
            "Successfully refreshed bearer token"
        );

        Ok(token)
    }

    /// Current token without refreshing.
    #[must_use]
    pub fn current(&self) -> BearerToken {
        self.store.current()
    }

    /// Number of successful exchanges performed by this manager.
    #[must_use]
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }
}
