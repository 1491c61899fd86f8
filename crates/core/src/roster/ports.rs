//! Port interfaces for roster data
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use rosterlink_domain::constants::{DEFAULT_TEAM_ROLE_TEMPLATE, TEAM_ROLE_TEMPLATE_KEY};
use rosterlink_domain::{
    ConfigEntry, Result, RosterLinkError, TeamInfo, TeamLookup, TeamRecord, TournamentInfo,
    TournamentLookup,
};

/// Trait for the remote tournament platform
#[async_trait]
pub trait TournamentApi: Send + Sync {
    /// Fetch one team, located through the local cache.
    ///
    /// Fails with `NotFound` if the team is not cached for the tournament.
    async fn get_team_info(&self, tournament_id: &str, lookup: &TeamLookup) -> Result<TeamInfo>;

    /// Fetch every team of a tournament in server order.
    async fn get_all_team_info(&self, tournament_id: &str) -> Result<Vec<TeamInfo>>;

    /// Write a team back to the platform and update the local cache.
    async fn patch_team_info(&self, tournament_id: &str, team: &TeamInfo) -> Result<()>;
}

/// Trait for the cached participant ↔ Discord mapping
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find(&self, tournament_id: &str, lookup: &TeamLookup) -> Result<Option<TeamRecord>>;

    /// All cached teams of a tournament.
    async fn list(&self, tournament_id: &str) -> Result<Vec<TeamRecord>>;

    /// Insert or update a record and commit.
    async fn upsert(&self, record: &TeamRecord) -> Result<()>;
}

/// Trait for the tournament registry
#[async_trait]
pub trait TournamentRepository: Send + Sync {
    async fn find(&self, lookup: &TournamentLookup) -> Result<Option<TournamentInfo>>;

    /// Register a tournament and commit.
    ///
    /// Fails if the tournament is already registered.
    async fn add(&self, tournament: &TournamentInfo) -> Result<()>;
}

/// Trait for per-tournament bot configuration
#[async_trait]
pub trait BotConfigRepository: Send + Sync {
    /// Insert a new setting and commit.
    async fn add_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()>;

    /// `None` if no row exists; a present row may hold a `NULL` value.
    async fn get_value(&self, tournament_id: &str, name: &str) -> Result<Option<ConfigEntry>>;

    /// Update an existing setting and commit.
    ///
    /// Fails with `NotFound` if the setting does not exist.
    async fn set_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()>;

    /// Seed the default settings for a newly registered tournament.
    async fn create_default_config(&self, tournament_id: &str) -> Result<()> {
        self.add_value(tournament_id, TEAM_ROLE_TEMPLATE_KEY, Some(DEFAULT_TEAM_ROLE_TEMPLATE))
            .await
    }

    /// Id of the group new team groups are created from.
    async fn team_role_template(&self, tournament_id: &str) -> Result<Option<u64>> {
        let entry = self.get_value(tournament_id, TEAM_ROLE_TEMPLATE_KEY).await?;
        let raw = entry.and_then(|entry| entry.value);

        raw.map(|value| {
            value.trim().parse::<u64>().map_err(|_| {
                RosterLinkError::Config(format!(
                    "{TEAM_ROLE_TEMPLATE_KEY} for tournament {tournament_id} is not a role id: {value}"
                ))
            })
        })
        .transpose()
    }
}
