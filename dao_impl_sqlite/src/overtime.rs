use std::sync::Arc;

use crate::{date_from_db, date_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    overtime::{OvertimeDao, OvertimeEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct OvertimeDb {
    user_id: Vec<u8>,
    work_date: String,
    mertid: f64,
    ot50: f64,
    ot100: f64,
    ot200: f64,
}

impl TryFrom<&OvertimeDb> for OvertimeEntity {
    type Error = DaoError;

    fn try_from(overtime: &OvertimeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id_from_db(&overtime.user_id)?,
            date: date_from_db(&overtime.work_date)?,
            mertid: overtime.mertid as f32,
            ot50: overtime.ot50 as f32,
            ot100: overtime.ot100 as f32,
            ot200: overtime.ot200 as f32,
        })
    }
}

pub struct OvertimeDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl OvertimeDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl OvertimeDao for OvertimeDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<OvertimeEntity>, DaoError> {
        query_as::<_, OvertimeDb>(
            "SELECT user_id, work_date, mertid, ot50, ot100, ot200 FROM overtime WHERE user_id = ? AND work_date = ?",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(OvertimeEntity::try_from)
        .transpose()
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[OvertimeEntity]>, DaoError> {
        query_as::<_, OvertimeDb>(
            "SELECT user_id, work_date, mertid, ot50, ot100, ot200 FROM overtime WHERE user_id = ? AND work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(OvertimeEntity::try_from)
        .collect::<Result<Arc<[OvertimeEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &OvertimeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO overtime (user_id, work_date, mertid, ot50, ot100, ot200, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT(user_id, work_date) DO UPDATE SET mertid = excluded.mertid, ot50 = excluded.ot50, ot100 = excluded.ot100, ot200 = excluded.ot200, update_process = excluded.update_process",
        )
        .bind(id_to_db(entity.user_id))
        .bind(date_to_db(entity.date)?)
        .bind(entity.mertid as f64)
        .bind(entity.ot50 as f64)
        .bind(entity.ot100 as f64)
        .bind(entity.ot200 as f64)
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
        query(r"DELETE FROM overtime WHERE user_id = ? AND work_date = ?")
            .bind(id_to_db(user_id))
            .bind(date_to_db(date)?)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
