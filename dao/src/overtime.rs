use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq)]
pub struct OvertimeEntity {
    pub user_id: Uuid,
    pub date: time::Date,
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait OvertimeDao {
    type Transaction: crate::Transaction;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<OvertimeEntity>, DaoError>;
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[OvertimeEntity]>, DaoError>;
    async fn upsert(
        &self,
        entity: &OvertimeEntity,
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
