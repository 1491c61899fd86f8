//! Tournament registry and bot configuration records

use serde::{Deserialize, Serialize};

/// A Toornament tournament hosted in a Discord guild
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub tournament_id: String,
    pub guild_id: u64,
    pub name: Option<String>,
}

/// How to find a team in the local cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamLookup {
    /// By the Discord role tagging the team
    ByRole(u64),
    /// By the team name used on Discord and Toornament
    ByName(String),
}

/// How to find a tournament in the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentLookup {
    ById(String),
    ByGuildAndName { guild_id: u64, name: String },
}

/// Cached mapping between a Toornament participant and Discord entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub participant_id: String,
    pub tournament_id: String,
    pub name: String,
    pub role_id: Option<u64>,
    pub emote_id: Option<u64>,
}

/// A row of the per-tournament bot configuration
///
/// A present row may still carry a `NULL` value, which is distinct from the
/// row not existing at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    pub tournament_id: String,
    pub name: String,
    pub value: Option<String>,
}
