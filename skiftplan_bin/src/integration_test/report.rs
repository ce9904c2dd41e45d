use service::day_entry::{Absence, DayEntryService as _, Overtime};
use service::employee::{EmployeeService as _, EmployeeUpdate, Role};
use service::permission::Authentication;
use service::report::ReportService as _;
use service::rotation::Team;
use service::ServiceError;
use time::macros::date;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_report_approval_and_resubmit() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let context = Authentication::Context(anna);
    let day_entry_service = test_setup.app_state.day_entry_service();
    let report_service = test_setup.app_state.report_service();

    let report = report_service
        .save_report(anna, 2024, 1, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(report.totals.plan, 168.0);
    assert_eq!(report.totals.worked, 168.0);
    assert!(!report.changes);

    let approved = report_service
        .approve_report(report.id, test_setup.admin_id, test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(approved.approved_by, Some(test_setup.admin_id));

    day_entry_service
        .save_absence(
            &Absence {
                user_id: anna,
                date: date!(2024 - 01 - 03),
                reason: "Sjuk".into(),
                hours: 12.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    day_entry_service
        .save_overtime(
            &Overtime {
                user_id: anna,
                date: date!(2024 - 01 - 22),
                mertid: 0.0,
                ot50: 2.5,
                ot100: 0.0,
                ot200: 0.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();

    let resubmitted = report_service
        .save_report(anna, 2024, 1, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(resubmitted.id, report.id);
    assert_eq!(resubmitted.totals.absence, 12.0);
    assert_eq!(resubmitted.totals.worked, 156.0);
    assert_eq!(resubmitted.totals.ot50, 2.5);
    assert!(resubmitted.changes);
    assert_eq!(resubmitted.approved_by, None);

    let stored = report_service
        .get_report(anna, 2024, 1, context, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.id, report.id);
    assert_eq!(stored.totals, resubmitted.totals);
    assert!(!stored.is_approved());
}

#[tokio::test]
async fn test_report_list_for_controller() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Örjan", Team::A, Role::User).await;
    let bertil = test_setup.create_employee("Bertil", Team::B, Role::User).await;
    let report_service = test_setup.app_state.report_service();
    for user_id in [anna, bertil] {
        report_service
            .save_report(user_id, 2024, 3, Authentication::Context(user_id), None)
            .await
            .unwrap();
    }

    let result = report_service
        .list_reports(2024, 3, Authentication::Context(anna), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let summaries = report_service
        .list_reports(2024, 3, test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name.as_ref(), "Bertil");
    assert_eq!(summaries[0].team, Team::B);
    assert!(!summaries[0].approved);

    // Hidden employees disappear from the list.
    test_setup
        .app_state
        .employee_service()
        .update(
            bertil,
            &EmployeeUpdate {
                hidden: Some(true),
                ..Default::default()
            },
            test_setup.admin(),
            None,
        )
        .await
        .unwrap();
    let summaries = report_service
        .list_reports(2024, 3, test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].user_id, anna);
}
