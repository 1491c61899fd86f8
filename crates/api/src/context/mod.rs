//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use rosterlink_common::auth::TokenManager;
use rosterlink_common::resilience::{RateLimiter, RateLimiterConfig};
use rosterlink_core::{
    BotConfigRepository, ChatPlatform, RosterSyncService, TeamRepository, TournamentApi,
    TournamentRepository,
};
use rosterlink_domain::{Result, RosterLinkError, Settings};
use rosterlink_infra::database::{
    SqlBotConfigRepository, SqlTeamRepository, SqlTournamentRepository,
};
use rosterlink_infra::toornament::{
    ClientCredentialsExchanger, RequestExecutor, ToornamentTokenManager, Transport,
};
use rosterlink_infra::{CredentialStore, DbManager, HttpClient, ToornamentClient};
use tracing::info;

/// Type alias for team repository port trait object
type DynTeamRepository = dyn TeamRepository;

/// Type alias for tournament repository port trait object
type DynTournamentRepository = dyn TournamentRepository;

/// Type alias for bot config repository port trait object
type DynBotConfigRepository = dyn BotConfigRepository;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub settings: Settings,
    pub credentials: Arc<CredentialStore>,
    pub db: Arc<DbManager>,
    pub executor: Arc<RequestExecutor>,
    pub toornament: Arc<ToornamentClient>,
    pub teams: Arc<DynTeamRepository>,
    pub tournaments: Arc<DynTournamentRepository>,
    pub bot_config: Arc<DynBotConfigRepository>,
    /// Present only when a chat platform adapter was supplied
    pub roster_sync: Option<Arc<RosterSyncService>>,
}

impl AppContext {
    /// Build the context from `settings`.
    ///
    /// Loads the credential file (probing the standard locations when
    /// `settings.auth_path` is unset), opens the configured cache and makes
    /// sure its tables exist. Roster sync is only available when `chat` is
    /// given.
    ///
    /// # Errors
    /// Returns `Config` for missing or invalid credentials and settings,
    /// `Storage` if the cache cannot be opened.
    pub async fn new(settings: Settings, chat: Option<Arc<dyn ChatPlatform>>) -> Result<Self> {
        info!(backend = %settings.cache_backend, "Initializing application context");

        let credentials = CredentialStore::load(settings.auth_path.clone())?;
        let db = DbManager::open(&settings, &credentials.database()).await?;

        Self::from_parts(settings, credentials, db, chat).await
    }

    /// Build the context from an already loaded credential store and an
    /// open cache.
    ///
    /// # Errors
    /// Returns `Config` for invalid settings, `Storage` if the cache tables
    /// cannot be created.
    pub async fn from_parts(
        settings: Settings,
        credentials: CredentialStore,
        db: DbManager,
        chat: Option<Arc<dyn ChatPlatform>>,
    ) -> Result<Self> {
        let credentials = Arc::new(credentials);
        let db = Arc::new(db);

        let created = db.init_tables(false).await?;
        if !created.is_empty() {
            info!(tables = ?created, "Created cache tables");
        }

        let limiter = RateLimiter::new(RateLimiterConfig::from_millis(settings.rate_limit_interval_ms))
            .map_err(|e| RosterLinkError::Config(format!("Invalid rate limit: {e}")))?;
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(settings.http_timeout_secs))
            .build()?;
        let transport = Arc::new(Transport::new(
            http,
            Arc::new(limiter),
            credentials.api_key(),
            settings.api_base_url.clone(),
        ));

        let exchanger = ClientCredentialsExchanger::new(Arc::clone(&transport), Arc::clone(&credentials));
        let tokens: ToornamentTokenManager = TokenManager::new(
            Arc::new(exchanger),
            Arc::clone(&credentials),
            chrono::Duration::seconds(settings.token_margin_secs),
        );
        let executor = Arc::new(RequestExecutor::new(transport, Arc::new(tokens)));

        let teams: Arc<DynTeamRepository> = Arc::new(SqlTeamRepository::new(Arc::clone(&db)));
        let tournaments: Arc<DynTournamentRepository> =
            Arc::new(SqlTournamentRepository::new(Arc::clone(&db)));
        let bot_config: Arc<DynBotConfigRepository> =
            Arc::new(SqlBotConfigRepository::new(Arc::clone(&db)));

        let toornament = Arc::new(ToornamentClient::new(
            Arc::clone(&executor),
            Arc::clone(&teams),
            Arc::clone(&tournaments),
            settings.page_size,
        ));

        let roster_sync = chat.map(|chat| {
            Arc::new(RosterSyncService::new(
                Arc::clone(&toornament) as Arc<dyn TournamentApi>,
                Arc::clone(&tournaments),
                Arc::clone(&bot_config),
                chat,
            ))
        });

        info!(
            api_base_url = %settings.api_base_url,
            page_size = settings.page_size,
            roster_sync = roster_sync.is_some(),
            "Application context ready"
        );

        Ok(Self {
            settings,
            credentials,
            db,
            executor,
            toornament,
            teams,
            tournaments,
            bot_config,
            roster_sync,
        })
    }

    /// Roster sync service, or `InvalidInput` when no chat platform is
    /// attached.
    pub fn roster_sync(&self) -> Result<&Arc<RosterSyncService>> {
        self.roster_sync.as_ref().ok_or_else(|| {
            RosterLinkError::InvalidInput("roster sync needs a chat platform connection".into())
        })
    }
}
