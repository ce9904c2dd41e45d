use std::sync::Arc;

use crate::employee::{team_from_db, team_to_db};
use crate::{date_from_db, date_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    settings::{SettingsDao, SettingsEntity, TeamSettingEntity},
    DaoError,
};
use sqlx::{query, query_as};

#[derive(sqlx::FromRow)]
struct SettingsDb {
    start_date: String,
}

#[derive(sqlx::FromRow)]
struct TeamSettingDb {
    team: String,
    anchor_date: Option<String>,
    name: String,
}

impl TryFrom<&TeamSettingDb> for TeamSettingEntity {
    type Error = DaoError;

    fn try_from(team_setting: &TeamSettingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            team: team_from_db(&team_setting.team)?,
            anchor_date: team_setting
                .anchor_date
                .as_deref()
                .map(date_from_db)
                .transpose()?,
            name: team_setting.name.as_str().into(),
        })
    }
}

pub struct SettingsDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl SettingsDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl SettingsDao for SettingsDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(&self, tx: Self::Transaction) -> Result<Option<SettingsEntity>, DaoError> {
        let settings = query_as::<_, SettingsDb>("SELECT start_date FROM settings WHERE id = 1")
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        let Some(settings) = settings else {
            return Ok(None);
        };
        let teams = query_as::<_, TeamSettingDb>(
            "SELECT team, anchor_date, name FROM team_setting ORDER BY team",
        )
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(TeamSettingEntity::try_from)
        .collect::<Result<Arc<[TeamSettingEntity]>, DaoError>>()?;
        Ok(Some(SettingsEntity {
            start_date: date_from_db(&settings.start_date)?,
            teams,
        }))
    }

    async fn save(
        &self,
        entity: &SettingsEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO settings (id, start_date, update_process) VALUES (1, ?, ?)
              ON CONFLICT(id) DO UPDATE SET start_date = excluded.start_date, update_process = excluded.update_process",
        )
        .bind(date_to_db(entity.start_date)?)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;

        for team in entity.teams.iter() {
            let anchor_date = team.anchor_date.map(date_to_db).transpose()?;
            query(
                r"INSERT INTO team_setting (team, anchor_date, name, update_process) VALUES (?, ?, ?, ?)
                  ON CONFLICT(team) DO UPDATE SET anchor_date = excluded.anchor_date, name = excluded.name, update_process = excluded.update_process",
            )
            .bind(team_to_db(team.team))
            .bind(anchor_date)
            .bind(team.name.as_ref())
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        }
        Ok(())
    }
}
