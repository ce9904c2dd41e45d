use std::sync::Arc;

use crate::{date_from_db, date_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    shift_override::{ShiftOverrideDao, ShiftOverrideEntity, ShiftTypeEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ShiftOverrideDb {
    user_id: Vec<u8>,
    work_date: String,
    shift_type: String,
}

fn shift_type_to_db(shift_type: ShiftTypeEntity) -> &'static str {
    match shift_type {
        ShiftTypeEntity::Day => "DAG",
        ShiftTypeEntity::Night => "NATT",
    }
}

fn shift_type_from_db(value: &str) -> Result<ShiftTypeEntity, DaoError> {
    match value {
        "DAG" => Ok(ShiftTypeEntity::Day),
        "NATT" => Ok(ShiftTypeEntity::Night),
        _ => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

impl TryFrom<&ShiftOverrideDb> for ShiftOverrideEntity {
    type Error = DaoError;

    fn try_from(shift_override: &ShiftOverrideDb) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: id_from_db(&shift_override.user_id)?,
            date: date_from_db(&shift_override.work_date)?,
            shift_type: shift_type_from_db(&shift_override.shift_type)?,
        })
    }
}

pub struct ShiftOverrideDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ShiftOverrideDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ShiftOverrideDao for ShiftOverrideDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<ShiftOverrideEntity>, DaoError> {
        query_as::<_, ShiftOverrideDb>(
            "SELECT user_id, work_date, shift_type FROM shift_override WHERE user_id = ? AND work_date = ?",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(date)?)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ShiftOverrideEntity::try_from)
        .transpose()
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ShiftOverrideEntity]>, DaoError> {
        query_as::<_, ShiftOverrideDb>(
            "SELECT user_id, work_date, shift_type FROM shift_override WHERE user_id = ? AND work_date BETWEEN ? AND ? ORDER BY work_date",
        )
        .bind(id_to_db(user_id))
        .bind(date_to_db(from)?)
        .bind(date_to_db(to)?)
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(ShiftOverrideEntity::try_from)
        .collect::<Result<Arc<[ShiftOverrideEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &ShiftOverrideEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO shift_override (user_id, work_date, shift_type, update_process) VALUES (?, ?, ?, ?)
              ON CONFLICT(user_id, work_date) DO UPDATE SET shift_type = excluded.shift_type, update_process = excluded.update_process",
        )
        .bind(id_to_db(entity.user_id))
        .bind(date_to_db(entity.date)?)
        .bind(shift_type_to_db(entity.shift_type))
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
        query(r"DELETE FROM shift_override WHERE user_id = ? AND work_date = ?")
            .bind(id_to_db(user_id))
            .bind(date_to_db(date)?)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
