use std::sync::Arc;

use crate::{date_from_db, date_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    manual_hours::{ManualHoursDao, ManualHoursEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ManualHoursDb {
    user_id: Vec<u8>,
    work_date: String,
    hours: f64,
}

impl TryFrom<&ManualHoursDb> for ManualHoursEntity {
    type Error = DaoError;

    fn try_from(manual_hours: &ManualHoursDb) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id_from_db(&manual_hours.user_id)?,
            date: date_from_db(&manual_hours.work_date)?,
            hours: manual_hours.hours as f32,
        })
    }
}

pub struct ManualHoursDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ManualHoursDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ManualHoursDao for ManualHoursDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<ManualHoursEntity>, DaoError> {
        query_as::<_, ManualHoursDb>(
            "SELECT user_id, work_date, hours FROM manual_hours WHERE user_id = ? AND work_date = ?",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ManualHoursEntity::try_from)
        .transpose()
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ManualHoursEntity]>, DaoError> {
        query_as::<_, ManualHoursDb>(
            "SELECT user_id, work_date, hours FROM manual_hours WHERE user_id = ? AND work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ManualHoursEntity::try_from)
        .collect::<Result<Arc<[ManualHoursEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &ManualHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO manual_hours (user_id, work_date, hours, update_process) VALUES (?, ?, ?, ?)
              ON CONFLICT(user_id, work_date) DO UPDATE SET hours = excluded.hours, update_process = excluded.update_process",
        )
        .bind(id_to_db(entity.user_id))
        .bind(date_to_db(entity.date)?)
        .bind(entity.hours as f64)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        date: time::Date,
        _process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(r"DELETE FROM manual_hours WHERE user_id = ? AND work_date = ?")
            .bind(id_to_db(user_id))
            .bind(date_to_db(date)?)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
