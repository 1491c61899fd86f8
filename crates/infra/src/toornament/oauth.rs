//! OAuth2 client-credentials exchange against the Toornament token endpoint
//!
//! The exchange goes through the plain [`Transport`] (API key and rate
//! limiting, no bearer token), so it can never recurse into the token
//! manager that calls it.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use rosterlink_common::auth::{ExchangeError, TokenExchanger, TokenResponse};
use rosterlink_domain::constants::TOKEN_ENDPOINT_PATH;
use tracing::{debug, instrument};

use super::transport::Transport;
use crate::credentials::CredentialStore;

/// Requests bearer tokens with the client id and secret from the
/// credential store
pub struct ClientCredentialsExchanger {
    transport: Arc<Transport>,
    credentials: Arc<CredentialStore>,
}

impl ClientCredentialsExchanger {
    pub fn new(transport: Arc<Transport>, credentials: Arc<CredentialStore>) -> Self {
        Self { transport, credentials }
    }
}

#[async_trait]
impl TokenExchanger for ClientCredentialsExchanger {
    #[instrument(skip(self))]
    async fn exchange(&self) -> Result<TokenResponse, ExchangeError> {
        let client = self.credentials.client_credentials();
        let url = self.transport.url(TOKEN_ENDPOINT_PATH);

        let form = [
            ("grant_type", "client_credentials"),
            ("scope", client.scope.as_str()),
            ("client_id", client.client_id.as_str()),
            ("client_secret", client.client_secret.as_str()),
        ];
        let builder = self.transport.request(Method::POST, &url).form(&form);

        let response = self
            .transport
            .dispatch(builder)
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ExchangeError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(ExchangeError::Rejected { status: status.as_u16(), body });
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| ExchangeError::InvalidResponse(e.to_string()))?;
        debug!(expires_in = token.expires_in, scope = ?token.scope, "Token exchange succeeded");
        Ok(token)
    }
}
