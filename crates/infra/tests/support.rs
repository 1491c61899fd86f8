#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rosterlink_common::auth::TokenManager;
use rosterlink_common::resilience::{RateLimiter, RateLimiterConfig};
use rosterlink_domain::{
    BallchasingCredentials, Credentials, DatabaseCredentials, DiscordCredentials,
    ToornamentCredentials,
};
use rosterlink_infra::database::{DbManager, SqlTeamRepository, SqlTournamentRepository};
use rosterlink_infra::toornament::{ClientCredentialsExchanger, RequestExecutor, Transport};
use rosterlink_infra::{CredentialStore, HttpClient, ToornamentClient};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

pub const API_KEY: &str = "api-key";
pub const TOURNAMENT: &str = "3715874592046841856";

/// Temporary SQLite cache that lives as long as the value.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a cache with every table bootstrapped.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::connect_sqlite(temp_dir.path().join("cache.db"))
            .await
            .expect("sqlite cache should open");
        manager.init_tables(false).await.expect("tables should be created");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }
}

pub fn credentials(access_token: &str, expires_at: DateTime<Utc>) -> Credentials {
    Credentials {
        discord: DiscordCredentials {
            token: "discord-token".into(),
            client_id: "123".into(),
            client_secret: "discord-secret".into(),
        },
        toornament: ToornamentCredentials {
            token: API_KEY.into(),
            client_id: "cid".into(),
            client_secret: "csecret".into(),
            auth_key: access_token.into(),
            auth_type: "Bearer".into(),
            auth_scope: "organizer:participant".into(),
            auth_expiry_date: expires_at,
        },
        database: DatabaseCredentials {
            host: "localhost".into(),
            port: None,
            user: "bot".into(),
            password: "pw".into(),
            database: "roster".into(),
        },
        ballchasing: BallchasingCredentials { token: "bc".into() },
    }
}

/// Full Toornament stack pointed at a mock server
pub struct ToornamentHarness {
    pub server: MockServer,
    pub store: Arc<CredentialStore>,
    pub executor: Arc<RequestExecutor>,
    pub client: ToornamentClient,
    pub teams: Arc<SqlTeamRepository>,
    pub db: TestDatabase,
}

impl ToornamentHarness {
    pub async fn new(access_token: &str, expires_at: DateTime<Utc>) -> Self {
        Self::with_interval(access_token, expires_at, 0).await
    }

    pub async fn with_interval(access_token: &str, expires_at: DateTime<Utc>, interval_ms: u64) -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(CredentialStore::from_credentials(credentials(access_token, expires_at)));

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .expect("http client should build");
        let limiter = RateLimiter::new(RateLimiterConfig::from_millis(interval_ms))
            .expect("interval should be valid");
        let transport = Arc::new(Transport::new(http, Arc::new(limiter), API_KEY, server.uri()));

        let exchanger = ClientCredentialsExchanger::new(Arc::clone(&transport), Arc::clone(&store));
        let tokens = TokenManager::new(Arc::new(exchanger), Arc::clone(&store), chrono::Duration::seconds(60));
        let executor = Arc::new(RequestExecutor::new(transport, Arc::new(tokens)));

        let db = TestDatabase::new().await;
        let teams = Arc::new(SqlTeamRepository::new(Arc::clone(&db.manager)));
        let tournaments = Arc::new(SqlTournamentRepository::new(Arc::clone(&db.manager)));
        let client = ToornamentClient::new(Arc::clone(&executor), teams.clone(), tournaments, 50);

        Self { server, store, executor, client, teams, db }
    }

    pub fn participants_path(&self) -> String {
        format!("/organizer/v2/tournaments/{TOURNAMENT}/participants")
    }

    pub fn participants_url(&self) -> String {
        format!("{}{}", self.server.uri(), self.participants_path())
    }
}

/// Participant JSON as returned by the organizer API.
pub fn participant(index: usize) -> Value {
    json!({
        "id": format!("{}", 1000 + index),
        "name": format!("Team {index}"),
        "custom_fields": { "short_name": format!("T{index}") },
        "lineup": [
            { "name": format!("Captain {index}"), "custom_fields": { "discord_id": 178_963_412_846_460_928_u64 + index as u64 } }
        ]
    })
}

pub fn participants(range: std::ops::Range<usize>) -> Value {
    Value::Array(range.map(participant).collect())
}
