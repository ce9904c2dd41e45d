use service::employee::Role;
use service::permission::Authentication;
use service::phrase::PhraseService as _;
use service::rotation::Team;
use service::ServiceError;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_phrase_catalog() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let phrase_service = test_setup.app_state.phrase_service();

    let kurs = phrase_service
        .create("Kurs ", test_setup.admin(), None)
        .await
        .unwrap();
    phrase_service
        .create("Extra städning", test_setup.admin(), None)
        .await
        .unwrap();

    let duplicate = phrase_service
        .create(" Kurs", test_setup.admin(), None)
        .await;
    assert!(matches!(duplicate, Err(ServiceError::PhraseAlreadyExists(phrase)) if phrase.as_ref() == "Kurs"));

    let forbidden = phrase_service
        .create("Möte", Authentication::Context(anna), None)
        .await;
    assert!(matches!(forbidden, Err(ServiceError::Forbidden)));

    let phrases = phrase_service
        .get_all(Authentication::Context(anna), None)
        .await
        .unwrap();
    let texts: Vec<&str> = phrases.iter().map(|phrase| phrase.phrase.as_ref()).collect();
    assert_eq!(texts, vec!["Extra städning", "Kurs"]);

    phrase_service
        .delete(kurs.id, test_setup.admin(), None)
        .await
        .unwrap();
    let result = phrase_service.delete(kurs.id, test_setup.admin(), None).await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(id)) if id == kurs.id));
    assert_eq!(
        phrase_service
            .get_all(test_setup.admin(), None)
            .await
            .unwrap()
            .len(),
        1
    );
}
