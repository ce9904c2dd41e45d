use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftTypeEntity {
    Day,
    Night,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShiftOverrideEntity {
    pub user_id: Uuid,
    pub date: time::Date,
    pub shift_type: ShiftTypeEntity,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ShiftOverrideDao {
    type Transaction: crate::Transaction;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<ShiftOverrideEntity>, DaoError>;
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ShiftOverrideEntity]>, DaoError>;
    async fn upsert(
        &self,
        entity: &ShiftOverrideEntity,
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
