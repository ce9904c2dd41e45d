use std::sync::Arc;

use crate::{date_from_db, date_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    absence::{AbsenceDao, AbsenceEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct AbsenceDb {
    user_id: Vec<u8>,
    work_date: String,
    reason: String,
    hours: f64,
}

impl TryFrom<&AbsenceDb> for AbsenceEntity {
    type Error = DaoError;

    fn try_from(absence: &AbsenceDb) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id_from_db(&absence.user_id)?,
            date: date_from_db(&absence.work_date)?,
            reason: absence.reason.as_str().into(),
            hours: absence.hours as f32,
        })
    }
}

pub struct AbsenceDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl AbsenceDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl AbsenceDao for AbsenceDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<AbsenceEntity>, DaoError> {
        query_as::<_, AbsenceDb>(
            "SELECT user_id, work_date, reason, hours FROM absence WHERE user_id = ? AND work_date = ?",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(AbsenceEntity::try_from)
        .transpose()
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AbsenceEntity]>, DaoError> {
        query_as::<_, AbsenceDb>(
            "SELECT user_id, work_date, reason, hours FROM absence WHERE user_id = ? AND work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AbsenceEntity::try_from)
        .collect::<Result<Arc<[AbsenceEntity]>, DaoError>>()
    }

    async fn find_by_range(
        &self,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AbsenceEntity]>, DaoError> {
        query_as::<_, AbsenceDb>(
            "SELECT user_id, work_date, reason, hours FROM absence WHERE work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(AbsenceEntity::try_from)
        .collect::<Result<Arc<[AbsenceEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &AbsenceEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO absence (user_id, work_date, reason, hours, update_process) VALUES (?, ?, ?, ?, ?)
              ON CONFLICT(user_id, work_date) DO UPDATE SET reason = excluded.reason, hours = excluded.hours, update_process = excluded.update_process",
        )
        .bind(id_to_db(entity.user_id))
        .bind(date_to_db(entity.date)?)
        .bind(entity.reason.as_ref())
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
        query(r"DELETE FROM absence WHERE user_id = ? AND work_date = ?")
            .bind(id_to_db(user_id))
            .bind(date_to_db(date)?)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
