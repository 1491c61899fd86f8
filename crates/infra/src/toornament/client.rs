//! Toornament organizer API client
//!
//! Implements [`TournamentApi`] on top of the [`RequestExecutor`]. Teams are
//! located through the local teams cache; the Discord role and emote ids
//! stored there are attached to every fetched team.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use rosterlink_core::{TeamRepository, TournamentApi, TournamentRepository};
use rosterlink_domain::constants::{ORGANIZER_API_PATH, PARTICIPANTS_RANGE_UNIT};
use rosterlink_domain::{
    Result, RosterLinkError, TeamInfo, TeamLookup, TeamRecord, TournamentInfo, TournamentLookup,
};
use serde_json::Value;
use tracing::{info, instrument};

use super::executor::RequestExecutor;

/// High-level Toornament client bound to the local cache
pub struct ToornamentClient {
    executor: Arc<RequestExecutor>,
    teams: Arc<dyn TeamRepository>,
    tournaments: Arc<dyn TournamentRepository>,
    page_size: u32,
}

impl ToornamentClient {
    pub fn new(
        executor: Arc<RequestExecutor>,
        teams: Arc<dyn TeamRepository>,
        tournaments: Arc<dyn TournamentRepository>,
        page_size: u32,
    ) -> Self {
        Self { executor, teams, tournaments, page_size }
    }

    fn participants_url(&self, tournament_id: &str) -> String {
        self.executor
            .transport()
            .url(&format!("{ORGANIZER_API_PATH}/tournaments/{tournament_id}/participants"))
    }

    fn participant_url(&self, tournament_id: &str, participant_id: &str) -> String {
        format!("{}/{participant_id}", self.participants_url(tournament_id))
    }

    fn parse_team(value: Value) -> Result<TeamInfo> {
        serde_json::from_value(value)
            .map_err(|e| RosterLinkError::Parse(format!("Invalid participant: {e}")))
    }

    /// Registered tournament, if any.
    ///
    /// # Errors
    /// Returns `Storage` if the registry cannot be read.
    pub async fn get_tournament_info(
        &self,
        lookup: &TournamentLookup,
    ) -> Result<Option<TournamentInfo>> {
        self.tournaments.find(lookup).await
    }

    /// Register a tournament hosted in `guild_id`.
    ///
    /// # Errors
    /// Returns `Storage` if the tournament is already registered or the
    /// write fails.
    pub async fn add_tournament(
        &self,
        tournament_id: &str,
        guild_id: u64,
        name: Option<&str>,
    ) -> Result<TournamentInfo> {
        let tournament = TournamentInfo {
            tournament_id: tournament_id.to_string(),
            guild_id,
            name: name.map(str::to_string),
        };
        self.tournaments.add(&tournament).await?;
        info!(tournament_id, guild_id, "Tournament registered");
        Ok(tournament)
    }
}

#[async_trait]
impl TournamentApi for ToornamentClient {
    #[instrument(skip(self))]
    async fn get_team_info(&self, tournament_id: &str, lookup: &TeamLookup) -> Result<TeamInfo> {
        let record = self.teams.find(tournament_id, lookup).await?.ok_or_else(|| {
            RosterLinkError::NotFound(format!(
                "Team {lookup:?} does not exist for tournament {tournament_id}"
            ))
        })?;

        let url = self.participant_url(tournament_id, &record.participant_id);
        let body = self.executor.get(&url, HeaderMap::new(), true).await?;

        let mut team = Self::parse_team(body)?;
        team.role_id = record.role_id;
        team.emote_id = record.emote_id;
        Ok(team)
    }

    #[instrument(skip(self))]
    async fn get_all_team_info(&self, tournament_id: &str) -> Result<Vec<TeamInfo>> {
        let url = self.participants_url(tournament_id);
        let items = self
            .executor
            .paginate(&url, PARTICIPANTS_RANGE_UNIT, self.page_size, true)
            .await?;

        let cached: HashMap<String, TeamRecord> = self
            .teams
            .list(tournament_id)
            .await?
            .into_iter()
            .map(|record| (record.participant_id.clone(), record))
            .collect();

        items
            .into_iter()
            .map(|item| {
                let mut team = Self::parse_team(item)?;
                if let Some(record) = cached.get(&team.id) {
                    team.role_id = record.role_id;
                    team.emote_id = record.emote_id;
                }
                Ok(team)
            })
            .collect()
    }

    #[instrument(skip(self, team), fields(participant_id = %team.id))]
    async fn patch_team_info(&self, tournament_id: &str, team: &TeamInfo) -> Result<()> {
        let url = self.participant_url(tournament_id, &team.id);
        self.executor.patch(&url, team, HeaderMap::new(), true).await?;

        self.teams
            .upsert(&TeamRecord {
                participant_id: team.id.clone(),
                tournament_id: tournament_id.to_string(),
                name: team.name.clone(),
                role_id: team.role_id,
                emote_id: team.emote_id,
            })
            .await?;

        info!(tournament_id, team = %team.name, "Team written back");
        Ok(())
    }
}
