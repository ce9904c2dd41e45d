use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TeamEntity {
    A,
    B,
    C,
    D,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleEntity {
    Admin,
    User,
    Controller,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeEntity {
    pub id: Uuid,
    pub name: Arc<str>,
    pub team: TeamEntity,
    pub role: RoleEntity,
    pub hidden: bool,
    pub created: time::PrimitiveDateTime,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait EmployeeDao {
    type Transaction: crate::Transaction;

    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
    async fn find_by_name(
        &self,
        name: &str,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError>;
    async fn create(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn update(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    /// Removes the employee together with all of their day entries, reports and leave requests.
    async fn delete(&self, id: Uuid, process: &str, tx: Self::Transaction)
        -> Result<(), DaoError>;
}
