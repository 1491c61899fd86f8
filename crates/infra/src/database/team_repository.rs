//! Teams cache repository
//!
//! Maps Toornament participants to the Discord role and emote created for
//! them.

use std::sync::Arc;

use async_trait::async_trait;
use rosterlink_common::storage::{Row, SqlValue};
use rosterlink_core::TeamRepository;
use rosterlink_domain::{Result, TeamLookup, TeamRecord};
use tracing::debug;

use super::manager::{id_from_sql, id_to_sql, DbManager};
use crate::errors::domain;

const SELECT_COLUMNS: &str = "SELECT participant_id, tournament_id, name, role_id, emote_id FROM teams";

/// Teams repository over the shared cache connection
pub struct SqlTeamRepository {
    db: Arc<DbManager>,
}

impl SqlTeamRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TeamRepository for SqlTeamRepository {
    async fn find(&self, tournament_id: &str, lookup: &TeamLookup) -> Result<Option<TeamRecord>> {
        let (sql, key) = match lookup {
            TeamLookup::ByRole(role_id) => (
                format!("{SELECT_COLUMNS} WHERE role_id = $1 AND tournament_id = $2"),
                SqlValue::Int(id_to_sql(*role_id)?),
            ),
            TeamLookup::ByName(name) => (
                format!("{SELECT_COLUMNS} WHERE name = $1 AND tournament_id = $2"),
                SqlValue::from(name.as_str()),
            ),
        };

        let rows = self
            .db
            .connection()
            .query(&sql, &[key, SqlValue::from(tournament_id)])
            .await
            .map_err(domain)?;

        rows.first().map(map_team_row).transpose()
    }

    async fn list(&self, tournament_id: &str) -> Result<Vec<TeamRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE tournament_id = $1 ORDER BY name");
        let rows = self
            .db
            .connection()
            .query(&sql, &[SqlValue::from(tournament_id)])
            .await
            .map_err(domain)?;

        rows.iter().map(map_team_row).collect()
    }

    async fn upsert(&self, record: &TeamRecord) -> Result<()> {
        let params = [
            SqlValue::from(record.participant_id.as_str()),
            SqlValue::from(record.role_id.map(id_to_sql).transpose()?),
            SqlValue::from(record.emote_id.map(id_to_sql).transpose()?),
            SqlValue::from(record.name.as_str()),
            SqlValue::from(record.tournament_id.as_str()),
        ];

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO teams (participant_id, role_id, emote_id, name, tournament_id) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (participant_id) DO UPDATE SET \
             role_id = excluded.role_id, emote_id = excluded.emote_id, \
             name = excluded.name, tournament_id = excluded.tournament_id",
            &params,
        )
        .await
        .map_err(domain)?;
        conn.commit().await.map_err(domain)?;

        debug!(participant_id = %record.participant_id, "Team cache row upserted");
        Ok(())
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn map_team_row(row: &Row) -> Result<TeamRecord> {
    let role_id = row.get_opt_i64(3).map_err(domain)?;
    let emote_id = row.get_opt_i64(4).map_err(domain)?;

    Ok(TeamRecord {
        participant_id: row.get_string(0).map_err(domain)?,
        tournament_id: row.get_string(1).map_err(domain)?,
        name: row.get_string(2).map_err(domain)?,
        role_id: role_id.map(id_from_sql).transpose()?,
        emote_id: emote_id.map(id_from_sql).transpose()?,
    })
}
