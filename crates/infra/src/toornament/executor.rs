//! Authorized request execution
//!
//! GET/POST/PATCH against the Toornament API. Each call:
//! 1. Ensures a valid bearer token when authorization is requested
//! 2. Attaches the API key (always) and the `Authorization` header
//! 3. Throttles, then dispatches
//! 4. Fails with `RemoteApi` on any non-success status
//!
//! Failed calls are never retried here.

use std::sync::Arc;

use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::{Method, Response};
use rosterlink_common::auth::TokenManager;
use rosterlink_domain::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::oauth::ClientCredentialsExchanger;
use super::transport::Transport;
use crate::credentials::CredentialStore;
use crate::errors::domain;

/// Token manager wired to the Toornament token endpoint and credential file
pub type ToornamentTokenManager = TokenManager<ClientCredentialsExchanger, CredentialStore>;

/// Request executor shared by every Toornament operation
pub struct RequestExecutor {
    transport: Arc<Transport>,
    tokens: Arc<ToornamentTokenManager>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<Transport>, tokens: Arc<ToornamentTokenManager>) -> Self {
        Self { transport, tokens }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn token_manager(&self) -> &ToornamentTokenManager {
        &self.tokens
    }

    /// GET `url` and return the JSON body.
    ///
    /// # Errors
    /// `Auth` if a needed token refresh fails, `RemoteApi` on a non-success
    /// status, `Network`/`Parse` for transport and body failures.
    #[instrument(skip(self, headers))]
    pub async fn get(&self, url: &str, headers: HeaderMap, authorized: bool) -> Result<Value> {
        let response = self.send(Method::GET, url, None::<&()>, headers, authorized).await?;
        Transport::read_json(response).await
    }

    /// POST a JSON body to `url` and return the JSON response.
    ///
    /// # Errors
    /// Same as [`RequestExecutor::get`].
    #[instrument(skip(self, body, headers))]
    pub async fn post<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        authorized: bool,
    ) -> Result<Value> {
        let response = self.send(Method::POST, url, Some(body), headers, authorized).await?;
        Transport::read_json(response).await
    }

    /// PATCH a JSON body to `url` and return the JSON response.
    ///
    /// # Errors
    /// Same as [`RequestExecutor::get`].
    #[instrument(skip(self, body, headers))]
    pub async fn patch<B: Serialize + Sync>(
        &self,
        url: &str,
        body: &B,
        headers: HeaderMap,
        authorized: bool,
    ) -> Result<Value> {
        let response = self.send(Method::PATCH, url, Some(body), headers, authorized).await?;
        Transport::read_json(response).await
    }

    /// Send one request and return the successful response with its headers.
    pub(crate) async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        headers: HeaderMap,
        authorized: bool,
    ) -> Result<Response> {
        let mut builder = self.transport.request(method, url).headers(headers);

        if authorized {
            let token = self.tokens.ensure_valid().await.map_err(domain)?;
            builder = builder.header(AUTHORIZATION, token.authorization_header());
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.transport.dispatch(builder).await?;
        let response = Transport::ensure_success(response).await?;
        debug!(status = response.status().as_u16(), "Toornament request succeeded");
        Ok(response)
    }
}
