use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq)]
pub struct ManualHoursEntity {
    pub user_id: Uuid,
    pub date: time::Date,
    pub hours: f32,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ManualHoursDao {
    type Transaction: crate::Transaction;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<ManualHoursEntity>, DaoError>;
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[ManualHoursEntity]>, DaoError>;
    async fn upsert(
        &self,
        entity: &ManualHoursEntity,
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
