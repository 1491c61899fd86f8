//! Commands against a mock organizer API and a SQLite cache

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rosterlink_api::{commands, AppContext};
use rosterlink_core::{BotConfigRepository, ChatPlatform, TeamRepository, TournamentRepository};
use rosterlink_domain::constants::{DEFAULT_TEAM_ROLE_TEMPLATE, TEAM_ROLE_TEMPLATE_KEY};
use rosterlink_domain::{RosterLinkError, TeamLookup, TeamRecord, TournamentLookup};
use serde_json::{json, Value};
use support::chat::FakeChat;
use support::{captain, credentials, participant, settings, TestApp, GUILD, TOURNAMENT};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn template_id() -> u64 {
    DEFAULT_TEAM_ROLE_TEMPLATE.parse().unwrap()
}

async fn mount_participants(app: &TestApp, count: usize) {
    let items: Vec<Value> = (0..count).map(participant).collect();
    let range = if count == 0 {
        "participants */0".to_string()
    } else {
        format!("participants 0-{}/{count}", count - 1)
    };

    Mock::given(method("GET"))
        .and(path(app.participants_path()))
        .and(header("Range", "participants=0-49"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", range.as_str())
                .set_body_json(Value::Array(items)),
        )
        .mount(&app.server)
        .await;
}

#[tokio::test]
async fn register_tournament_seeds_default_config() {
    let app = TestApp::new(None).await;

    let info = commands::register_tournament(&app.ctx, TOURNAMENT, GUILD, Some("Spring Cup"))
        .await
        .unwrap();
    assert_eq!(info.guild_id, GUILD);

    let stored = app
        .ctx
        .tournaments
        .find(&TournamentLookup::ById(TOURNAMENT.into()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name.as_deref(), Some("Spring Cup"));

    let entry = app.ctx.bot_config.get_value(TOURNAMENT, TEAM_ROLE_TEMPLATE_KEY).await.unwrap();
    assert_eq!(entry.unwrap().value.as_deref(), Some(DEFAULT_TEAM_ROLE_TEMPLATE));
}

#[tokio::test]
async fn registering_twice_is_a_storage_error() {
    let app = TestApp::new(None).await;
    commands::register_tournament(&app.ctx, TOURNAMENT, GUILD, None).await.unwrap();

    let err = commands::register_tournament(&app.ctx, TOURNAMENT, GUILD, None).await.unwrap_err();
    assert!(matches!(err, RosterLinkError::Storage(_)), "got {err:?}");
}

#[tokio::test]
async fn list_teams_attaches_cached_role_ids() {
    let app = TestApp::new(None).await;
    mount_participants(&app, 3).await;

    app.ctx
        .teams
        .upsert(&TeamRecord {
            participant_id: "1001".into(),
            tournament_id: TOURNAMENT.into(),
            name: "Team 1".into(),
            role_id: Some(555),
            emote_id: None,
        })
        .await
        .unwrap();

    let teams = commands::list_teams(&app.ctx, TOURNAMENT).await.unwrap();

    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].role_id, None);
    assert_eq!(teams[1].role_id, Some(555));
    assert_eq!(teams[1].lineup[0].discord_user_id(), Some(captain(1)));
}

#[tokio::test]
async fn list_teams_surfaces_remote_errors() {
    let app = TestApp::new(None).await;
    Mock::given(method("GET"))
        .and(path(app.participants_path()))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&app.server)
        .await;

    let err = commands::list_teams(&app.ctx, TOURNAMENT).await.unwrap_err();
    assert_eq!(err.remote_status(), Some(403));
}

#[tokio::test]
async fn sync_without_chat_platform_is_rejected() {
    let app = TestApp::new(None).await;

    let err = commands::sync_tournament(&app.ctx, TOURNAMENT).await.unwrap_err();
    assert!(matches!(err, RosterLinkError::InvalidInput(_)), "got {err:?}");
    assert!(app.server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn sync_creates_groups_and_writes_them_back() {
    let chat = Arc::new(FakeChat::new(
        &[captain(0), captain(1)],
        &[(template_id(), "Team Template")],
    ));
    let app = TestApp::new(Some(chat.clone() as Arc<dyn ChatPlatform>)).await;
    commands::register_tournament(&app.ctx, TOURNAMENT, GUILD, None).await.unwrap();
    mount_participants(&app, 2).await;

    Mock::given(method("PATCH"))
        .and(path_regex(format!(r"^{}/100\d$", app.participants_path())))
        .and(header("Authorization", "Bearer valid-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&app.server)
        .await;

    let report = commands::sync_tournament(&app.ctx, TOURNAMENT).await.unwrap();

    assert_eq!(report.teams_synced, 2);
    assert_eq!(report.groups_created, 2);
    assert_eq!(report.members_assigned, 2);
    assert_eq!(report.unresolved.len(), 2, "substitutes have no discord id");

    let group = chat.group_named("Team 0").unwrap();
    let cached = app
        .ctx
        .teams
        .find(TOURNAMENT, &TeamLookup::ByName("Team 0".into()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cached.role_id, Some(group.id));
    assert!(chat.assignments.lock().contains(&(captain(0), group.id)));
}

#[tokio::test]
async fn sync_of_unregistered_tournament_is_not_found() {
    let chat = Arc::new(FakeChat::new(&[], &[(template_id(), "Team Template")]));
    let app = TestApp::new(Some(chat as Arc<dyn ChatPlatform>)).await;

    let err = commands::sync_tournament(&app.ctx, TOURNAMENT).await.unwrap_err();
    assert!(err.is_not_found(), "got {err:?}");
}

#[tokio::test]
async fn context_loads_credential_file_and_creates_tables() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let auth_path = dir.path().join("auth.json");
    let creds = credentials("file-token", Utc::now() + Duration::hours(1));
    std::fs::write(&auth_path, serde_json::to_string(&creds).unwrap()).unwrap();

    let mut settings = settings(&server, dir.path());
    settings.auth_path = Some(auth_path.clone());

    let ctx = AppContext::new(settings, None).await.unwrap();

    assert_eq!(ctx.credentials.path(), Some(auth_path.as_path()));
    assert_eq!(ctx.credentials.api_key(), "api-key");
    assert!(ctx.db.init_tables(false).await.unwrap().is_empty());
    assert!(ctx.roster_sync.is_none());
}

#[tokio::test]
async fn context_rejects_missing_credential_file() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let mut settings = settings(&server, dir.path());
    settings.auth_path = Some(dir.path().join("missing.json"));

    let err = AppContext::new(settings, None).await.err().unwrap();
    assert!(matches!(err, RosterLinkError::Config(_)), "got {err:?}");
}
