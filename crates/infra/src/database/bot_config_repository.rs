//! Per-tournament bot configuration repository
//!
//! A missing row and a row holding `NULL` are reported differently:
//! `get_value` returns `None` for the former and an entry with
//! `value: None` for the latter.

use std::sync::Arc;

use async_trait::async_trait;
use rosterlink_common::storage::SqlValue;
use rosterlink_core::BotConfigRepository;
use rosterlink_domain::{ConfigEntry, Result, RosterLinkError};
use tracing::debug;

use super::manager::DbManager;
use crate::errors::domain;

/// Bot configuration stored in the `bot_config` table
pub struct SqlBotConfigRepository {
    db: Arc<DbManager>,
}

impl SqlBotConfigRepository {
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BotConfigRepository for SqlBotConfigRepository {
    async fn add_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()> {
        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO bot_config (tournament_id, name, value) VALUES ($1, $2, $3)",
            &[SqlValue::from(tournament_id), SqlValue::from(name), SqlValue::from(value)],
        )
        .await
        .map_err(domain)?;
        conn.commit().await.map_err(domain)?;

        debug!(tournament_id, name, "Config value added");
        Ok(())
    }

    async fn get_value(&self, tournament_id: &str, name: &str) -> Result<Option<ConfigEntry>> {
        let rows = self
            .db
            .connection()
            .query(
                "SELECT value FROM bot_config WHERE tournament_id = $1 AND name = $2",
                &[SqlValue::from(tournament_id), SqlValue::from(name)],
            )
            .await
            .map_err(domain)?;

        rows.first()
            .map(|row| {
                Ok(ConfigEntry {
                    tournament_id: tournament_id.to_string(),
                    name: name.to_string(),
                    value: row.get_opt_string(0).map_err(domain)?,
                })
            })
            .transpose()
    }

    async fn set_value(&self, tournament_id: &str, name: &str, value: Option<&str>) -> Result<()> {
        let conn = self.db.connection();
        let updated = conn
            .execute(
                "UPDATE bot_config SET value = $1 WHERE tournament_id = $2 AND name = $3",
                &[SqlValue::from(value), SqlValue::from(tournament_id), SqlValue::from(name)],
            )
            .await
            .map_err(domain)?;
        conn.commit().await.map_err(domain)?;

        if updated == 0 {
            return Err(RosterLinkError::NotFound(format!(
                "Config value {name} does not exist for tournament {tournament_id}"
            )));
        }
        debug!(tournament_id, name, "Config value updated");
        Ok(())
    }
}
