use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq)]
pub struct AbsenceEntity {
    pub user_id: Uuid,
    pub date: time::Date,
    pub reason: Arc<str>,
    pub hours: f32,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait AbsenceDao {
    type Transaction: crate::Transaction;

    async fn find(
        &self,
        user_id: Uuid,
        date: time::Date,
        tx: Self::Transaction,
    ) -> Result<Option<AbsenceEntity>, DaoError>;
    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AbsenceEntity]>, DaoError>;
    /// Absences of all employees in the given range.
    async fn find_by_range(
        &self,
        from: time::Date,
        to: time::Date,
        tx: Self::Transaction,
    ) -> Result<Arc<[AbsenceEntity]>, DaoError>;
    async fn upsert(
        &self,
        entity: &AbsenceEntity,
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
