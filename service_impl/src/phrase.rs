use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    phrase::{PhraseDao, PhraseEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    permission::{Authentication, ADMIN_PRIVILEGE},
    phrase::{Phrase, PhraseService},
    uuid_service::UuidService,
    PermissionService, ServiceError,
};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct PhraseServiceImpl: PhraseService = PhraseServiceDeps {
        PhraseDao: PhraseDao<Transaction = Self::Transaction> = phrase_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const PHRASE_SERVICE_PROCESS: &str = "phrase-service";

#[async_trait]
impl<Deps: PhraseServiceDeps> PhraseService for PhraseServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Phrase]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let phrases = self
            .phrase_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Phrase::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(phrases)
    }

    async fn create(
        &self,
        phrase: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Phrase, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;

        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Err(ServiceError::missing_value("phrase"));
        }
        if self
            .phrase_dao
            .find_by_phrase(phrase, tx.clone())
            .await?
            .is_some()
        {
            return Err(ServiceError::PhraseAlreadyExists(phrase.into()));
        }

        let phrase = Phrase {
            id: self.uuid_service.new_uuid("phrase-id"),
            phrase: phrase.into(),
            created: self.clock_service.date_time_now(),
        };
        self.phrase_dao
            .create(
                &PhraseEntity::from(&phrase),
                PHRASE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(phrase)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;
        if self.phrase_dao.find_by_id(id, tx.clone()).await?.is_none() {
            return Err(ServiceError::EntityNotFound(id));
        }
        self.phrase_dao
            .delete(id, PHRASE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }
}
