use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq)]
pub struct ReportEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: u32,
    pub month: u8,
    pub created: time::PrimitiveDateTime,
    pub plan: f32,
    pub worked: f32,
    pub absence: f32,
    pub leave: f32,
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
    pub changes: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<time::PrimitiveDateTime>,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ReportDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError>;
    async fn find_by_user_and_month(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError>;
    async fn find_by_month(
        &self,
        year: u32,
        month: u8,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError>;
    async fn find_by_year(
        &self,
        year: u32,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError>;
    async fn create(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}
