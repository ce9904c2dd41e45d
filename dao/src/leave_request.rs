use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveTypeEntity {
    Vacation,
    Atk,
    Comp,
    ChildCare,
    UnpaidLeave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeaveStatusEntity {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeaveRequestEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: LeaveTypeEntity,
    pub date_from: time::Date,
    pub date_to: time::Date,
    pub days: u32,
    pub hours: f32,
    pub status: LeaveStatusEntity,
    pub comment: Option<Arc<str>>,
    pub deny_reason: Option<Arc<str>>,
    pub created: time::PrimitiveDateTime,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<time::PrimitiveDateTime>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait LeaveRequestDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<LeaveRequestEntity>, DaoError>;
    /// Requests of one employee which are not cancelled, newest first.
    async fn find_active_by_user(
        &self,
        user_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError>;
    /// All requests which are not cancelled, newest first.
    async fn find_all_active(
        &self,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
