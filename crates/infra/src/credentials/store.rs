//! Credential store backed by the credential file
//!
//! Holds the parsed [`Credentials`] behind a read/write lock. Replacing the
//! bearer token swaps all four token fields in one write and then rewrites
//! the file in the format it was loaded from. A failed write is logged and
//! otherwise ignored; the in-memory token stays authoritative.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use parking_lot::RwLock;
use rosterlink_common::auth::{BearerToken, TokenResponse, TokenStore};
use rosterlink_domain::constants::TOKEN_SCOPE;
use rosterlink_domain::{Credentials, DatabaseCredentials, Result, RosterLinkError};
use tracing::{debug, info, warn};

use crate::config::{load_credentials, render_credentials};

/// OAuth2 client identity used for the client-credentials grant
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .finish()
    }
}

/// In-memory credentials with write-back to the credential file
#[derive(Debug)]
pub struct CredentialStore {
    credentials: RwLock<Credentials>,
    path: Option<PathBuf>,
}

impl CredentialStore {
    /// Load the credential file, probing the standard locations when `path`
    /// is `None`. Refreshed tokens are written back to the file that was
    /// read.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Config` if the file is missing or invalid.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let (credentials, loaded_from) = load_credentials(path)?;
        debug!(
            path = %loaded_from.display(),
            expires_at = %credentials.toornament.auth_expiry_date,
            "Credential store loaded"
        );
        Ok(Self { credentials: RwLock::new(credentials), path: Some(loaded_from) })
    }

    /// Store that never touches the filesystem.
    pub fn from_credentials(credentials: Credentials) -> Self {
        Self { credentials: RwLock::new(credentials), path: None }
    }

    /// Store that writes refreshed tokens to `path`.
    pub fn with_path(credentials: Credentials, path: impl Into<PathBuf>) -> Self {
        Self { credentials: RwLock::new(credentials), path: Some(path.into()) }
    }

    /// File refreshed tokens are written to, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current credentials.
    pub fn snapshot(&self) -> Credentials {
        self.credentials.read().clone()
    }

    /// Static Toornament API key.
    pub fn api_key(&self) -> String {
        self.credentials.read().toornament.token.clone()
    }

    /// Client identity for the token exchange
    ///
    /// The requested scope is always the participant scope; `auth_scope`
    /// only records what the last exchange granted.
    pub fn client_credentials(&self) -> ClientCredentials {
        let guard = self.credentials.read();
        let toornament = &guard.toornament;

        ClientCredentials {
            client_id: toornament.client_id.clone(),
            client_secret: toornament.client_secret.clone(),
            scope: TOKEN_SCOPE.to_string(),
        }
    }

    /// Connection parameters for the cache database.
    pub fn database(&self) -> DatabaseCredentials {
        self.credentials.read().database.clone()
    }

    /// Write the current credentials to `path`
    ///
    /// The format follows the file extension; JSON is indented with four
    /// spaces.
    ///
    /// # Errors
    /// Returns `RosterLinkError::Config` if encoding or writing fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let rendered = render_credentials(&self.snapshot(), path)?;
        std::fs::write(path, rendered).map_err(|e| {
            RosterLinkError::Config(format!(
                "Failed to write credential file {}: {e}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), "Credential file written");
        Ok(())
    }

    fn persist(&self) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        if let Err(err) = self.save(path) {
            warn!(path = %path.display(), error = %err, "Failed to persist refreshed token");
        }
    }
}

impl TokenStore for CredentialStore {
    fn current(&self) -> BearerToken {
        let guard = self.credentials.read();
        let toornament = &guard.toornament;
        BearerToken {
            access_token: toornament.auth_key.clone(),
            token_type: toornament.auth_type.clone(),
            scope: toornament.auth_scope.clone(),
            expires_at: toornament.auth_expiry_date,
        }
    }

    fn replace(&self, response: &TokenResponse) -> BearerToken {
        let token = BearerToken::from_response(response, Utc::now());

        {
            let mut guard = self.credentials.write();
            let toornament = &mut guard.toornament;
            toornament.auth_key.clone_from(&token.access_token);
            toornament.auth_type.clone_from(&token.token_type);
            if !token.scope.is_empty() {
                toornament.auth_scope.clone_from(&token.scope);
            }
            toornament.auth_expiry_date = token.expires_at;
        }

        info!(expires_at = %token.expires_at, "Bearer token replaced");
        self.persist();
        token
    }
}

impl CredentialStore {
    /// Whether the bearer token is expired or expires within `margin`.
    pub fn is_expired(&self, margin: Duration) -> bool {
        TokenStore::is_expired(self, margin)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rosterlink_domain::{
        BallchasingCredentials, DiscordCredentials, ToornamentCredentials,
    };
    use tempfile::TempDir;

    use super::*;

    fn credentials(expires_at: chrono::DateTime<Utc>) -> Credentials {
        Credentials {
            discord: DiscordCredentials {
                token: "discord".into(),
                client_id: "1".into(),
                client_secret: "ds".into(),
            },
            toornament: ToornamentCredentials {
                token: "api-key".into(),
                client_id: "cid".into(),
                client_secret: "cs".into(),
                auth_key: "old".into(),
                auth_type: "Bearer".into(),
                auth_scope: String::new(),
                auth_expiry_date: expires_at,
            },
            database: DatabaseCredentials {
                host: "localhost".into(),
                port: None,
                user: "u".into(),
                password: "p".into(),
                database: "bot".into(),
            },
            ballchasing: BallchasingCredentials { token: "bc".into() },
        }
    }

    fn response(lifetime: i64) -> TokenResponse {
        TokenResponse {
            access_token: "fresh".into(),
            expires_in: lifetime,
            token_type: "Bearer".into(),
            scope: Some("organizer:participant".into()),
        }
    }

    #[test]
    fn saved_file_loads_back_equal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.json");
        let original = credentials(Utc.with_ymd_and_hms(2020, 5, 31, 14, 24, 46).unwrap());

        CredentialStore::from_credentials(original.clone()).save(&path).unwrap();
        let reloaded = CredentialStore::load(Some(path.clone())).unwrap();

        assert_eq!(reloaded.snapshot(), original);
        assert_eq!(reloaded.path(), Some(path.as_path()));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n    \"Discord\""));
        assert!(written.contains("\"AuthExpiryDate\": \"31.05.2020, 14:24:46\""));
    }

    #[test]
    fn replace_sets_expiry_from_lifetime_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("auth.json");
        let store = CredentialStore::with_path(credentials(Utc::now()), &path);

        let before = Utc::now();
        let token = store.replace(&response(3600));

        let remaining = (token.expires_at - before).num_seconds();
        assert!((3599..=3601).contains(&remaining), "remaining = {remaining}");
        assert!(!store.is_expired(Duration::minutes(1)));

        let reloaded = CredentialStore::load(Some(path)).unwrap().snapshot();
        assert_eq!(reloaded.toornament.auth_key, "fresh");
        assert_eq!(reloaded.toornament.auth_scope, "organizer:participant");
        assert_eq!(reloaded.toornament.auth_expiry_date, token.expires_at);
    }

    #[test]
    fn failed_write_keeps_token_in_memory() {
        let store = CredentialStore::with_path(
            credentials(Utc::now()),
            "/nonexistent-dir/for/rosterlink/auth.json",
        );

        let token = store.replace(&response(600));

        assert_eq!(token.access_token, "fresh");
        assert_eq!(store.current().access_token, "fresh");
    }

    #[test]
    fn token_within_margin_counts_as_expired() {
        let store = CredentialStore::from_credentials(credentials(
            Utc::now() + Duration::seconds(30),
        ));

        assert!(store.is_expired(Duration::minutes(1)));
        assert!(!store.is_expired(Duration::zero()));
    }

    #[test]
    fn granted_scope_is_recorded_but_never_requested() {
        let store = CredentialStore::from_credentials(credentials(Utc::now()));
        store.replace(&TokenResponse {
            scope: Some("organizer:participant organizer:result".into()),
            ..response(3600)
        });

        assert_eq!(store.snapshot().toornament.auth_scope, "organizer:participant organizer:result");
        assert_eq!(store.client_credentials().scope, TOKEN_SCOPE);
    }

    #[test]
    fn empty_scope_falls_back_to_participant_scope() {
        let store = CredentialStore::from_credentials(credentials(Utc::now()));
        let client = store.client_credentials();

        assert_eq!(client.scope, TOKEN_SCOPE);
        assert_eq!(client.client_id, "cid");
        assert!(!format!("{client:?}").contains("cs\""));
        assert_eq!(store.api_key(), "api-key");
    }
}
