use std::sync::Arc;

use crate::{date_from_db, date_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    day_note::{DayNoteDao, DayNoteEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct DayNoteDb {
    user_id: Vec<u8>,
    work_date: String,
    note: String,
}

impl TryFrom<&DayNoteDb> for DayNoteEntity {
    type Error = DaoError;

    fn try_from(day_note: &DayNoteDb) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id_from_db(&day_note.user_id)?,
            date: date_from_db(&day_note.work_date)?,
            note: day_note.note.as_str().into(),
        })
    }
}

pub struct DayNoteDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl DayNoteDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl DayNoteDao for DayNoteDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<DayNoteEntity>, DaoError> {
        query_as::<_, DayNoteDb>(
            "SELECT user_id, work_date, note FROM day_note WHERE user_id = ? AND work_date = ?",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(DayNoteEntity::try_from)
        .transpose()
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[DayNoteEntity]>, DaoError> {
        query_as::<_, DayNoteDb>(
            "SELECT user_id, work_date, note FROM day_note WHERE user_id = ? AND work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(DayNoteEntity::try_from)
        .collect::<Result<Arc<[DayNoteEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &DayNoteEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO day_note (user_id, work_date, note, update_process) VALUES (?, ?, ?, ?)
              ON CONFLICT(user_id, work_date) DO UPDATE SET note = excluded.note, update_process = excluded.update_process",
        )
        .bind(id_to_db(entity.user_id))
        .bind(date_to_db(entity.date)?)
        .bind(entity.note.as_ref())
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
        query(r"DELETE FROM day_note WHERE user_id = ? AND work_date = ?")
            .bind(id_to_db(user_id))
            .bind(date_to_db(date)?)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
