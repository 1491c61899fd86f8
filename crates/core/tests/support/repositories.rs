//! In-memory repositories and tournament API

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use rosterlink_core::{BotConfigRepository, TournamentApi, TournamentRepository};
use rosterlink_domain::{
    ConfigEntry, Result, RosterLinkError, TeamInfo, TeamLookup, TournamentInfo, TournamentLookup,
};

#[derive(Default)]
pub struct InMemoryTournaments {
    pub tournaments: Mutex<Vec<TournamentInfo>>,
}

impl InMemoryTournaments {
    pub fn with(tournament: TournamentInfo) -> Self {
        Self { tournaments: Mutex::new(vec![tournament]) }
    }
}

#[async_trait]
impl TournamentRepository for InMemoryTournaments {
    async fn find(&self, lookup: &TournamentLookup) -> Result<Option<TournamentInfo>> {
        let tournaments = self.tournaments.lock();
        Ok(tournaments
            .iter()
            .find(|t| match lookup {
                TournamentLookup::ById(id) => &t.tournament_id == id,
                TournamentLookup::ByGuildAndName { guild_id, name } => {
                    t.guild_id == *guild_id && t.name.as_deref() == Some(name.as_str())
                }
            })
            .cloned())
    }

    async fn add(&self, tournament: &TournamentInfo) -> Result<()> {
        let mut tournaments = self.tournaments.lock();
        if tournaments.iter().any(|t| t.tournament_id == tournament.tournament_id) {
            return Err(RosterLinkError::Storage("duplicate tournament".into()));
        }
        tournaments.push(tournament.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryBotConfig {
    pub values: Mutex<HashMap<(String, String), Option<String>>>,
}

#[async_trait]
impl BotConfigRepository for InMemoryBotConfig {
    async fn add_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()> {
        self.values
            .lock()
            .insert((tournament_id.to_string(), name.to_string()), value.map(str::to_string));
        Ok(())
    }

    async fn get_value(&self, tournament_id: &str, name: &str) -> Result<Option<ConfigEntry>> {
        Ok(self.values.lock().get(&(tournament_id.to_string(), name.to_string())).map(|value| {
            ConfigEntry {
                tournament_id: tournament_id.to_string(),
                name: name.to_string(),
                value: value.clone(),
            }
        }))
    }

    async fn set_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()> {
        let mut values = self.values.lock();
        let slot = values
            .get_mut(&(tournament_id.to_string(), name.to_string()))
            .ok_or_else(|| RosterLinkError::NotFound(name.to_string()))?;
        *slot = value.map(str::to_string);
        Ok(())
    }
}

/// Tournament API serving a fixed team list and recording PATCHes
#[derive(Default)]
pub struct FakeTournamentApi {
    pub teams: Mutex<Vec<TeamInfo>>,
    pub patched: Mutex<Vec<TeamInfo>>,
    pub fail_patch_for: Mutex<Option<String>>,
}

impl FakeTournamentApi {
    pub fn with_teams(teams: Vec<TeamInfo>) -> Self {
        Self { teams: Mutex::new(teams), ..Self::default() }
    }
}

#[async_trait]
impl TournamentApi for FakeTournamentApi {
    async fn get_team_info(&self, _tournament_id: &str, lookup: &TeamLookup) -> Result<TeamInfo> {
        self.teams
            .lock()
            .iter()
            .find(|team| match lookup {
                TeamLookup::ByRole(role) => team.role_id == Some(*role),
                TeamLookup::ByName(name) => &team.name == name,
            })
            .cloned()
            .ok_or_else(|| RosterLinkError::NotFound("team".into()))
    }

    async fn get_all_team_info(&self, _tournament_id: &str) -> Result<Vec<TeamInfo>> {
        Ok(self.teams.lock().clone())
    }

    async fn patch_team_info(&self, _tournament_id: &str, team: &TeamInfo) -> Result<()> {
        if self.fail_patch_for.lock().as_deref() == Some(team.id.as_str()) {
            return Err(RosterLinkError::RemoteApi { status: 500, body: "boom".into() });
        }
        self.patched.lock().push(team.clone());
        Ok(())
    }
}
