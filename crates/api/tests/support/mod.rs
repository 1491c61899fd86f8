#![allow(dead_code)]

pub mod chat;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rosterlink_api::AppContext;
use rosterlink_core::ChatPlatform;
use rosterlink_domain::{
    BallchasingCredentials, CacheBackend, Credentials, DatabaseCredentials, DiscordCredentials,
    Settings, ToornamentCredentials,
};
use rosterlink_infra::{CredentialStore, DbManager};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

pub const API_KEY: &str = "api-key";
pub const TOURNAMENT: &str = "3715874592046841856";
pub const GUILD: u64 = 705_449_478_573_621_339;
pub const CAPTAIN_BASE: u64 = 178_963_412_846_460_928;

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

/// Settings pointing at `server` with an unthrottled client and a SQLite
/// cache inside `dir`.
pub fn settings(server: &MockServer, dir: &Path) -> Settings {
    Settings {
        api_base_url: server.uri(),
        rate_limit_interval_ms: 0,
        http_timeout_secs: 5,
        cache_backend: CacheBackend::Sqlite,
        sqlite_path: dir.join("cache.db"),
        ..Settings::default()
    }
}

/// Application context wired against a mock Toornament server
pub struct TestApp {
    pub server: MockServer,
    pub ctx: AppContext,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new(chat: Option<Arc<dyn ChatPlatform>>) -> Self {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let settings = settings(&server, temp_dir.path());

        let store = CredentialStore::from_credentials(credentials(
            "valid-token",
            Utc::now() + Duration::hours(1),
        ));
        let db = DbManager::connect_sqlite(&settings.sqlite_path)
            .await
            .expect("sqlite cache should open");
        let ctx = AppContext::from_parts(settings, store, db, chat)
            .await
            .expect("context should build");

        Self { server, ctx, _temp_dir: temp_dir }
    }

    pub fn participants_path(&self) -> String {
        format!("/organizer/v2/tournaments/{TOURNAMENT}/participants")
    }
}

/// Participant JSON as returned by the organizer API.
pub fn participant(index: usize) -> Value {
    json!({
        "id": format!("{}", 1000 + index),
        "name": format!("Team {index}"),
        "custom_fields": { "short_name": format!("T{index}") },
        "lineup": [
            { "name": format!("Captain {index}"), "custom_fields": { "discord_id": captain(index).to_string() } },
            { "name": format!("Sub {index}"), "custom_fields": {} }
        ]
    })
}

pub fn captain(index: usize) -> u64 {
    CAPTAIN_BASE + index as u64
}
