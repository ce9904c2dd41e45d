use crate::phrase::{PhraseServiceDeps, PhraseServiceImpl};
use crate::test::error_test::*;
use dao::phrase::{MockPhraseDao, PhraseEntity};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::clock::MockClockService;
use service::permission::{ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE};
use service::phrase::{Phrase, PhraseService};
use service::uuid_service::MockUuidService;
use service::{MockPermissionService, ServiceError, ValidationFailureItem};
use uuid::{uuid, Uuid};

pub struct PhraseServiceDependencies {
    pub phrase_dao: MockPhraseDao,
    pub permission_service: MockPermissionService,
    pub clock_service: MockClockService,
    pub uuid_service: MockUuidService,
}
impl PhraseServiceDeps for PhraseServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type PhraseDao = MockPhraseDao;
    type PermissionService = MockPermissionService;
    type ClockService = MockClockService;
    type UuidService = MockUuidService;
    type TransactionDao = MockTransactionDao;
}
impl PhraseServiceDependencies {
    pub fn build_service(self) -> PhraseServiceImpl<PhraseServiceDependencies> {
        PhraseServiceImpl {
            phrase_dao: self.phrase_dao.into(),
            permission_service: self.permission_service.into(),
            clock_service: self.clock_service.into(),
            uuid_service: self.uuid_service.into(),
            transaction_dao: build_transaction_dao().into(),
        }
    }
}

fn phrase_id() -> Uuid {
    uuid!("5B0C7E2A-1D43-4F0E-8A55-0C6B9E2F3A01")
}

fn build_dependencies(privileges: &'static [&'static str]) -> PhraseServiceDependencies {
    let mut clock_service = MockClockService::new();
    clock_service
        .expect_date_time_now()
        .returning(generate_default_datetime);
    let mut uuid_service = MockUuidService::new();
    uuid_service
        .expect_new_uuid()
        .with(eq("phrase-id"))
        .returning(|_| phrase_id());
    PhraseServiceDependencies {
        phrase_dao: MockPhraseDao::new(),
        permission_service: build_permission_service(privileges),
        clock_service,
        uuid_service,
    }
}

fn default_phrase_entity() -> PhraseEntity {
    PhraseEntity {
        id: phrase_id(),
        phrase: "Utbildningsdag".into(),
        created: generate_default_datetime(),
    }
}

#[tokio::test]
async fn test_get_all() {
    let mut dependencies = build_dependencies(&[]);
    dependencies
        .phrase_dao
        .expect_all()
        .returning(|_| Ok([default_phrase_entity()].into()));
    let service = dependencies.build_service();
    let phrases = service.get_all(().auth(), None).await.unwrap();
    assert_eq!(phrases.as_ref(), &[Phrase::from(&default_phrase_entity())]);
}

#[tokio::test]
async fn test_create_trims_phrase() {
    let mut dependencies = build_dependencies(&[ADMIN_PRIVILEGE]);
    dependencies
        .phrase_dao
        .expect_find_by_phrase()
        .with(eq("Utbildningsdag"), always())
        .returning(|_, _| Ok(None));
    dependencies
        .phrase_dao
        .expect_create()
        .with(eq(default_phrase_entity()), eq("phrase-service"), always())
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();
    let phrase = service
        .create(" Utbildningsdag ", ().auth(), None)
        .await
        .unwrap();
    assert_eq!(phrase, Phrase::from(&default_phrase_entity()));
}

#[tokio::test]
async fn test_create_duplicate() {
    let mut dependencies = build_dependencies(&[ADMIN_PRIVILEGE]);
    dependencies
        .phrase_dao
        .expect_find_by_phrase()
        .with(eq("Utbildningsdag"), always())
        .returning(|_, _| Ok(Some(default_phrase_entity())));
    dependencies.phrase_dao.expect_create().never();
    let service = dependencies.build_service();
    let result = service.create("Utbildningsdag  ", ().auth(), None).await;
    assert!(
        matches!(result, Err(ServiceError::PhraseAlreadyExists(phrase)) if phrase.as_ref() == "Utbildningsdag")
    );
}

#[tokio::test]
async fn test_create_blank() {
    let mut dependencies = build_dependencies(&[ADMIN_PRIVILEGE]);
    dependencies.phrase_dao.expect_create().never();
    let service = dependencies.build_service();
    let result = service.create("   ", ().auth(), None).await;
    test_validation_error(
        &result,
        &ValidationFailureItem::MissingValue("phrase".into()),
        1,
    );
}

#[tokio::test]
async fn test_create_requires_admin() {
    let mut dependencies = build_dependencies(&[CONTROLLER_PRIVILEGE]);
    dependencies.phrase_dao.expect_create().never();
    let service = dependencies.build_service();
    let result = service.create("Utbildningsdag", ().auth(), None).await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_delete() {
    let mut dependencies = build_dependencies(&[ADMIN_PRIVILEGE]);
    dependencies
        .phrase_dao
        .expect_find_by_id()
        .with(eq(phrase_id()), always())
        .returning(|_, _| Ok(Some(default_phrase_entity())));
    dependencies
        .phrase_dao
        .expect_delete()
        .with(eq(phrase_id()), eq("phrase-service"), always())
        .times(1)
        .returning(|_, _, _| Ok(()));
    let service = dependencies.build_service();
    service.delete(phrase_id(), ().auth(), None).await.unwrap();
}

#[tokio::test]
async fn test_delete_not_found() {
    let mut dependencies = build_dependencies(&[ADMIN_PRIVILEGE]);
    dependencies
        .phrase_dao
        .expect_find_by_id()
        .returning(|_, _| Ok(None));
    dependencies.phrase_dao.expect_delete().never();
    let service = dependencies.build_service();
    let result = service.delete(phrase_id(), ().auth(), None).await;
    test_not_found(&result, &phrase_id());
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let mut dependencies = build_dependencies(&[]);
    dependencies.phrase_dao.expect_delete().never();
    let service = dependencies.build_service();
    let result = service.delete(phrase_id(), ().auth(), None).await;
    test_forbidden(&result);
}
