use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use skiftplan_utils::{format_iso_date, parse_iso_date};
use sqlx::SqlitePool;
use time::{format_description::well_known::Iso8601, PrimitiveDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

pub mod absence;
pub mod day_note;
pub mod employee;
pub mod leave_request;
pub mod manual_hours;
pub mod overtime;
pub mod phrase;
pub mod report;
pub mod settings;
pub mod shift_override;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

pub(crate) fn id_to_db(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

pub(crate) fn id_from_db(bytes: &[u8]) -> Result<Uuid, DaoError> {
    Ok(Uuid::from_slice(bytes)?)
}

pub(crate) fn date_to_db(date: time::Date) -> Result<String, DaoError> {
    Ok(format_iso_date(date)?)
}

pub(crate) fn date_from_db(value: &str) -> Result<time::Date, DaoError> {
    Ok(parse_iso_date(value)?)
}

pub(crate) fn date_time_to_db(date_time: PrimitiveDateTime) -> Result<String, DaoError> {
    Ok(date_time.format(&Iso8601::DATE_TIME)?)
}

pub(crate) fn date_time_from_db(value: &str) -> Result<PrimitiveDateTime, DaoError> {
    Ok(PrimitiveDateTime::parse(value, &Iso8601::DATE_TIME)?)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        // Nested service calls hold clones of the same transaction. Only the last one commits.
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        }
        Ok(())
    }
}
