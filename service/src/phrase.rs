use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::phrase::PhraseEntity;
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// Common phrase offered when writing a day note.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub id: Uuid,
    pub phrase: Arc<str>,
    pub created: time::PrimitiveDateTime,
}

impl From<&PhraseEntity> for Phrase {
    fn from(entity: &PhraseEntity) -> Self {
        Self {
            id: entity.id,
            phrase: entity.phrase.clone(),
            created: entity.created,
        }
    }
}

impl From<&Phrase> for PhraseEntity {
    fn from(phrase: &Phrase) -> Self {
        Self {
            id: phrase.id,
            phrase: phrase.phrase.clone(),
            created: phrase.created,
        }
    }
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait PhraseService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Phrase]>, ServiceError>;

    /// Stores the trimmed phrase. Fails with `PhraseAlreadyExists` for a duplicate.
    async fn create(
        &self,
        phrase: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Phrase, ServiceError>;

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}
