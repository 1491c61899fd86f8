//! Chat-platform entities and roster sync results

use serde::{Deserialize, Serialize};

/// A guild member on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMember {
    pub id: u64,
    pub display_name: String,
}

/// A group (Discord role) on the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatGroup {
    pub id: u64,
    pub name: String,
}

/// Why a lineup member could not be assigned to the team group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The Discord id custom field is empty or not a number
    MissingDiscordId,
    /// No member with that id is in the guild
    NotInGuild,
}

/// A lineup member left out of a sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedMember {
    pub team: String,
    pub player: String,
    pub discord_id: Option<String>,
    pub reason: UnresolvedReason,
}

/// Outcome of syncing one tournament's teams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub tournament_id: String,
    pub teams_synced: usize,
    pub groups_created: usize,
    pub groups_reused: usize,
    pub members_assigned: usize,
    pub unresolved: Vec<UnresolvedMember>,
}
