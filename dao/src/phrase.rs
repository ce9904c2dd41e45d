use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhraseEntity {
    pub id: Uuid,
    pub phrase: Arc<str>,
    pub created: time::PrimitiveDateTime,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait PhraseDao {
    type Transaction: crate::Transaction;

    /// All phrases ordered by their text.
    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[PhraseEntity]>, DaoError>;
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<PhraseEntity>, DaoError>;
    async fn find_by_phrase(
        &self,
        phrase: &str,
        tx: Self::Transaction,
    ) -> Result<Option<PhraseEntity>, DaoError>;
    async fn create(
        &self,
        entity: &PhraseEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn delete(&self, id: Uuid, process: &str, tx: Self::Transaction)
        -> Result<(), DaoError>;
}
