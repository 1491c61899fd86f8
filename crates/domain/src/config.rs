//! Configuration management
//!
//! Two kinds of configuration exist:
//! - [`Credentials`]: the durable credential file, read at startup and
//!   rewritten whenever the Toornament bearer token is replaced
//! - [`Settings`]: runtime knobs read from the environment

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_RATE_LIMIT_MS, DEFAULT_SQLITE_PATH,
    DEFAULT_TOKEN_MARGIN_SECS, PARTICIPANTS_PAGE_SIZE,
};
use crate::impl_domain_enum_conversions;

/// Contents of the durable credential file
///
/// Example (JSON):
///
/// ```json
/// {
///     "Discord": { "Token": "...", "ClientID": "...", "ClientSecret": "..." },
///     "Toornament": {
///         "Token": "...", "ClientID": "...", "ClientSecret": "...",
///         "AuthKey": "...", "AuthType": "Bearer", "AuthScope": "organizer:participant",
///         "AuthExpiryDate": "31.05.2020, 14:24:46"
///     },
///     "Database": { "IP": "...", "User": "...", "Password": "...", "Database": "..." },
///     "Ballchasing": { "Token": "..." }
/// }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Discord")]
    pub discord: DiscordCredentials,
    #[serde(rename = "Toornament")]
    pub toornament: ToornamentCredentials,
    #[serde(rename = "Database", alias = "MySQL")]
    pub database: DatabaseCredentials,
    #[serde(rename = "Ballchasing")]
    pub ballchasing: BallchasingCredentials,
}

/// Discord bot credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscordCredentials {
    pub token: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub client_secret: String,
}

/// Toornament API key, OAuth2 client and current bearer token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ToornamentCredentials {
    /// Static API key sent as `X-Api-Key`
    pub token: String,
    #[serde(rename = "ClientID")]
    pub client_id: String,
    pub client_secret: String,
    /// Current bearer token
    pub auth_key: String,
    pub auth_type: String,
    #[serde(default)]
    pub auth_scope: String,
    /// Wall-clock time after which `auth_key` must not be used
    #[serde(with = "crate::utils::expiry_format")]
    pub auth_expiry_date: DateTime<Utc>,
}

/// Connection parameters for the cache database
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DatabaseCredentials {
    #[serde(rename = "IP", alias = "Host")]
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
}

/// Ballchasing.com stats service token
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BallchasingCredentials {
    pub token: String,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("discord", &self.discord)
            .field("toornament", &self.toornament)
            .field("database", &self.database)
            .field("ballchasing", &self.ballchasing)
            .finish()
    }
}

impl fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordCredentials")
            .field("token", &REDACTED)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .finish()
    }
}

impl fmt::Debug for ToornamentCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToornamentCredentials")
            .field("token", &REDACTED)
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("auth_key", &REDACTED)
            .field("auth_type", &self.auth_type)
            .field("auth_scope", &self.auth_scope)
            .field("auth_expiry_date", &self.auth_expiry_date)
            .finish()
    }
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &REDACTED)
            .field("database", &self.database)
            .finish()
    }
}

impl fmt::Debug for BallchasingCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BallchasingCredentials").field("token", &REDACTED).finish()
    }
}

/// Which relational store backs the local cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Remote Postgres server from the credential file's `Database` section
    Postgres,
    /// Local SQLite file
    Sqlite,
}

impl_domain_enum_conversions!(CacheBackend {
    Postgres => "postgres",
    Sqlite => "sqlite",
});

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Credential file location; probed when unset
    pub auth_path: Option<PathBuf>,
    pub api_base_url: String,
    pub rate_limit_interval_ms: u64,
    pub http_timeout_secs: u64,
    pub token_margin_secs: i64,
    pub page_size: u32,
    pub cache_backend: CacheBackend,
    pub sqlite_path: PathBuf,
    pub db_tls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_path: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            rate_limit_interval_ms: DEFAULT_RATE_LIMIT_MS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            token_margin_secs: DEFAULT_TOKEN_MARGIN_SECS,
            page_size: PARTICIPANTS_PAGE_SIZE,
            cache_backend: CacheBackend::Postgres,
            sqlite_path: PathBuf::from(DEFAULT_SQLITE_PATH),
            db_tls: false,
        }
    }
}
