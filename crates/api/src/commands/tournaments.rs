//! Tournament registry commands

use std::time::Instant;

use rosterlink_domain::{Result, TournamentInfo};
use tracing::info;

use super::roster::finish;
use crate::context::AppContext;

/// Register `tournament_id` as hosted in `guild_id` and seed its default
/// bot configuration.
///
/// # Errors
/// Returns `Storage` if the tournament is already registered or a write
/// fails.
pub async fn register_tournament(
    ctx: &AppContext,
    tournament_id: &str,
    guild_id: u64,
    name: Option<&str>,
) -> Result<TournamentInfo> {
    let command_name = "tournaments::register_tournament";
    let start = Instant::now();

    info!(command = command_name, tournament_id, guild_id, "Registering tournament");

    let result = register(ctx, tournament_id, guild_id, name).await;
    finish(command_name, start, &result);

    result
}

async fn register(
    ctx: &AppContext,
    tournament_id: &str,
    guild_id: u64,
    name: Option<&str>,
) -> Result<TournamentInfo> {
    let tournament = ctx.toornament.add_tournament(tournament_id, guild_id, name).await?;
    ctx.bot_config.create_default_config(tournament_id).await?;
    Ok(tournament)
}
