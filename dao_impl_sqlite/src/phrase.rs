use std::sync::Arc;

use crate::{date_time_from_db, date_time_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    phrase::{PhraseDao, PhraseEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::instrument;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct PhraseDb {
    id: Vec<u8>,
    phrase: String,
    created: String,
}

impl TryFrom<&PhraseDb> for PhraseEntity {
    type Error = DaoError;

    fn try_from(phrase: &PhraseDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id_from_db(&phrase.id)?,
            phrase: phrase.phrase.as_str().into(),
            created: date_time_from_db(&phrase.created)?,
        })
    }
}

const SELECT_PHRASE: &str = "SELECT id, phrase, created FROM common_phrase";

pub struct PhraseDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl PhraseDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl PhraseDao for PhraseDaoImpl {
    type Transaction = crate::TransactionImpl;

    #[instrument(skip(self, tx))]
    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[PhraseEntity]>, DaoError> {
        query_as::<_, PhraseDb>(&format!("{SELECT_PHRASE} ORDER BY phrase"))
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(PhraseEntity::try_from)
            .collect::<Result<Arc<[PhraseEntity]>, DaoError>>()
    }

    #[instrument(skip(self, tx))]
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<PhraseEntity>, DaoError> {
        query_as::<_, PhraseDb>(&format!("{SELECT_PHRASE} WHERE id = ?"))
            .bind(id_to_db(id))
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(PhraseEntity::try_from)
            .transpose()
    }

    #[instrument(skip(self, tx))]
    async fn find_by_phrase(
        &self,
        phrase: &str,
        tx: Self::Transaction,
    ) -> Result<Option<PhraseEntity>, DaoError> {
        query_as::<_, PhraseDb>(&format!("{SELECT_PHRASE} WHERE phrase = ?"))
            .bind(phrase)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(PhraseEntity::try_from)
            .transpose()
    }

    async fn create(
        &self,
        entity: &PhraseEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(r"INSERT INTO common_phrase (id, phrase, created, update_process) VALUES (?, ?, ?, ?)")
            .bind(id_to_db(entity.id))
            .bind(entity.phrase.as_ref())
            .bind(date_time_to_db(entity.created)?)
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }

    async fn delete(
        &self,
        id: Uuid,
        _process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(r"DELETE FROM common_phrase WHERE id = ?")
            .bind(id_to_db(id))
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}
