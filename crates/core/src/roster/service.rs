//! Roster sync service - core business logic

use std::sync::Arc;

use rosterlink_domain::{
    ChatGroup, Result, RosterLinkError, SyncReport, TeamInfo, TournamentLookup, UnresolvedMember,
    UnresolvedReason,
};
use tracing::{debug, info, warn};

use super::ports::{BotConfigRepository, TournamentApi, TournamentRepository};
use crate::chat_ports::ChatPlatform;

/// Pushes Toornament rosters into Discord
///
/// For every team of a tournament a Discord group is ensured, each lineup
/// member with a resolvable Discord id is added to it, and the group id is
/// written back to Toornament and the local cache.
pub struct RosterSyncService {
    api: Arc<dyn TournamentApi>,
    tournaments: Arc<dyn TournamentRepository>,
    bot_config: Arc<dyn BotConfigRepository>,
    chat: Arc<dyn ChatPlatform>,
}

impl RosterSyncService {
    /// Create a new roster sync service
    pub fn new(
        api: Arc<dyn TournamentApi>,
        tournaments: Arc<dyn TournamentRepository>,
        bot_config: Arc<dyn BotConfigRepository>,
        chat: Arc<dyn ChatPlatform>,
    ) -> Self {
        Self { api, tournaments, bot_config, chat }
    }

    /// Sync every team of `tournament_id`
    ///
    /// Members that cannot be resolved are listed in the report. Any other
    /// failure aborts the sync; teams handled before the failure stay synced.
    pub async fn sync_teams(&self, tournament_id: &str) -> Result<SyncReport> {
        let tournament = self
            .tournaments
            .find(&TournamentLookup::ById(tournament_id.to_string()))
            .await?
            .ok_or_else(|| {
                RosterLinkError::NotFound(format!("tournament {tournament_id} is not registered"))
            })?;
        let guild_id = tournament.guild_id;

        let template = self.team_group_template(tournament_id, guild_id).await?;
        let teams = self.api.get_all_team_info(tournament_id).await?;
        info!(tournament_id, guild_id, teams = teams.len(), "Syncing tournament teams");

        let mut report = SyncReport { tournament_id: tournament_id.to_string(), ..SyncReport::default() };

        for mut team in teams {
            let group = self.ensure_team_group(guild_id, &team, &template, &mut report).await?;
            self.assign_lineup(guild_id, &team, &group, &mut report).await?;

            team.role_id = Some(group.id);
            self.api.patch_team_info(tournament_id, &team).await?;
            report.teams_synced += 1;
        }

        info!(
            tournament_id,
            teams = report.teams_synced,
            created = report.groups_created,
            assigned = report.members_assigned,
            unresolved = report.unresolved.len(),
            "Tournament sync complete"
        );
        Ok(report)
    }

    async fn team_group_template(&self, tournament_id: &str, guild_id: u64) -> Result<ChatGroup> {
        let template_id = self.bot_config.team_role_template(tournament_id).await?.ok_or_else(|| {
            RosterLinkError::InvalidInput(format!(
                "no team role template configured for tournament {tournament_id}"
            ))
        })?;

        self.chat.lookup_group(guild_id, template_id).await?.ok_or_else(|| {
            RosterLinkError::InvalidInput(format!(
                "team role template {template_id} does not exist in guild {guild_id}"
            ))
        })
    }

    async fn ensure_team_group(
        &self,
        guild_id: u64,
        team: &TeamInfo,
        template: &ChatGroup,
        report: &mut SyncReport,
    ) -> Result<ChatGroup> {
        if let Some(role_id) = team.role_id {
            if let Some(group) = self.chat.lookup_group(guild_id, role_id).await? {
                debug!(team = %team.name, role_id, "Reusing cached team group");
                report.groups_reused += 1;
                return Ok(group);
            }
            warn!(team = %team.name, role_id, "Cached team group no longer exists, recreating");
        }

        let group = self.chat.create_group(guild_id, &team.name, template).await?;
        debug!(team = %team.name, role_id = group.id, "Created team group");
        report.groups_created += 1;
        Ok(group)
    }

    async fn assign_lineup(
        &self,
        guild_id: u64,
        team: &TeamInfo,
        group: &ChatGroup,
        report: &mut SyncReport,
    ) -> Result<()> {
        for player in &team.lineup {
            let unresolved = |reason| UnresolvedMember {
                team: team.name.clone(),
                player: player.name.clone(),
                discord_id: player.custom_fields.discord_id.clone(),
                reason,
            };

            let Some(user_id) = player.discord_user_id() else {
                report.unresolved.push(unresolved(UnresolvedReason::MissingDiscordId));
                continue;
            };

            match self.chat.resolve_member(guild_id, user_id).await? {
                Some(member) => {
                    self.chat.assign_group(guild_id, &member, group).await?;
                    report.members_assigned += 1;
                }
                None => {
                    debug!(team = %team.name, player = %player.name, user_id, "Member not in guild");
                    report.unresolved.push(unresolved(UnresolvedReason::NotInGuild));
                }
            }
        }
        Ok(())
    }
}
