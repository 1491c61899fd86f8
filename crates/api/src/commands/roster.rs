//! Team roster commands

use std::time::Instant;

use rosterlink_core::TournamentApi;
use rosterlink_domain::{Result, SyncReport, TeamInfo};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::utils::logging::{error_label, log_command_execution};

/// Push every team of `tournament_id` into the chat platform.
///
/// # Errors
/// Returns `InvalidInput` when the context has no chat platform, otherwise
/// whatever the sync itself fails with.
pub async fn sync_tournament(ctx: &AppContext, tournament_id: &str) -> Result<SyncReport> {
    let command_name = "roster::sync_tournament";
    let start = Instant::now();

    info!(command = command_name, tournament_id, "Syncing tournament rosters");

    let result = match ctx.roster_sync() {
        Ok(service) => service.sync_teams(tournament_id).await,
        Err(e) => Err(e),
    };
    finish(command_name, start, &result);

    result
}

/// Fetch every team of `tournament_id` with its cached Discord ids attached.
///
/// # Errors
/// Returns `RemoteApi`, `Auth`, `Network` or `Parse` when the participant
/// listing fails.
pub async fn list_teams(ctx: &AppContext, tournament_id: &str) -> Result<Vec<TeamInfo>> {
    let command_name = "roster::list_teams";
    let start = Instant::now();

    let result = ctx.toornament.get_all_team_info(tournament_id).await;
    if let Ok(teams) = &result {
        info!(command = command_name, tournament_id, teams = teams.len(), "Fetched teams");
    }
    finish(command_name, start, &result);

    result
}

pub(crate) fn finish<T>(command: &str, start: Instant, result: &Result<T>) {
    log_command_execution(command, start.elapsed(), result.is_ok());
    if let Err(err) = result {
        warn!(command, error_type = error_label(err), error = %err, "Command failed");
    }
}
