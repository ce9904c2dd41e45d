use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq)]
pub struct DayNoteEntity {
    pub user_id: Uuid,
    pub date: time::Date,
    pub note: Arc<str>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait DayNoteDao {
    type Transaction: crate::Transaction;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<DayNoteEntity>, DaoError>;
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[DayNoteEntity]>, DaoError>;
    async fn upsert(
        &self,
        entity: &DayNoteEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn delete(
        &self,
        user_id: Uuid,
        date: time::Date,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
