//! Tournament registry repository

use std::sync::Arc;

use async_trait::async_trait;
use rosterlink_common::storage::{Row, SqlValue};
use rosterlink_core::TournamentRepository;
use rosterlink_domain::{Result, TournamentInfo, TournamentLookup};

use super::manager::{id_from_sql, id_to_sql, DbManager};
use crate::errors::domain;

/// Registry of tournaments hosted in Discord guilds
pub struct SqlTournamentRepository {
    db: Arc<DbManager>,
}

impl SqlTournamentRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TournamentRepository for SqlTournamentRepository {
    async fn find(&self, lookup: &TournamentLookup) -> Result<Option<TournamentInfo>> {
        let (sql, params) = match lookup {
            TournamentLookup::ById(tournament_id) => (
                "SELECT tournament_id, guild_id, name FROM tournaments WHERE tournament_id = $1",
                vec![SqlValue::from(tournament_id.as_str())],
            ),
            TournamentLookup::ByGuildAndName { guild_id, name } => (
                "SELECT tournament_id, guild_id, name FROM tournaments WHERE guild_id = $1 AND name = $2",
                vec![SqlValue::Int(id_to_sql(*guild_id)?), SqlValue::from(name.as_str())],
            ),
        };

        let rows = self.db.connection().query(sql, &params).await.map_err(domain)?;
        rows.first().map(map_tournament_row).transpose()
    }

    async fn add(&self, tournament: &TournamentInfo) -> Result<()> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO tournaments (tournament_id, guild_id, name) VALUES ($1, $2, $3)",
            &[
                SqlValue::from(tournament.tournament_id.as_str()),
                SqlValue::Int(id_to_sql(tournament.guild_id)?),
                SqlValue::from(tournament.name.as_deref()),
            ],
        )
        .await
        .map_err(domain)?;
        conn.commit().await.map_err(domain)
    }
}

fn map_tournament_row(row: &Row) -> Result<TournamentInfo> {
    Ok(TournamentInfo {
        tournament_id: row.get_string(0).map_err(domain)?,
        guild_id: id_from_sql(row.get_i64(1).map_err(domain)?)?,
        name: row.get_opt_string(2).map_err(domain)?,
    })
}
