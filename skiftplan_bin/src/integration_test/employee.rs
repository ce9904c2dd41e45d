use std::sync::Arc;

use service::day_entry::{
    Absence, DayEntryService as _, DayNote, ManualHours, Overtime, ShiftOverride,
};
use service::employee::{Employee, EmployeeService as _, EmployeeUpdate, Role};
use service::leave::{LeaveRequestService as _, LeaveType};
use service::permission::Authentication;
use service::report::ReportService as _;
use service::rotation::{ShiftType, Team};
use service::ServiceError;
use time::macros::date;
use uuid::Uuid;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_padded_duplicate_name_is_a_conflict() {
    let test_setup = TestSetup::new().await;
    test_setup.create_employee("Anna", Team::A, Role::User).await;
    let employee_service = test_setup.app_state.employee_service();

    let result = employee_service
        .create(
            &Employee {
                id: Uuid::nil(),
                name: " Anna ".into(),
                team: Team::B,
                role: Role::User,
                hidden: false,
                created: None,
            },
            test_setup.admin(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NameAlreadyExists(name)) if name.as_ref() == "Anna"));

    let bertil = test_setup.create_employee("Bertil", Team::B, Role::User).await;
    let result = employee_service
        .update(
            bertil,
            &EmployeeUpdate {
                name: Some("Anna  ".into()),
                ..Default::default()
            },
            test_setup.admin(),
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::NameAlreadyExists(name)) if name.as_ref() == "Anna"));
}

#[tokio::test]
async fn test_delete_employee_removes_owned_records() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let context = Authentication::Context(anna);
    let day_entry_service = test_setup.app_state.day_entry_service();
    let day = date!(2024 - 01 - 03);

    day_entry_service
        .save_absence(
            &Absence {
                user_id: anna,
                date: day,
                reason: "Sjuk".into(),
                hours: 4.0,
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
                date: day,
                mertid: 1.0,
                ot50: 0.0,
                ot100: 0.0,
                ot200: 0.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    day_entry_service
        .save_manual_hours(
            &ManualHours {
                user_id: anna,
                date: day,
                hours: 10.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    day_entry_service
        .save_note(
            &DayNote {
                user_id: anna,
                date: day,
                note: Arc::from("Utbildning"),
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    day_entry_service
        .save_shift_override(
            &ShiftOverride {
                user_id: anna,
                date: day,
                shift_type: Some(ShiftType::Day),
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    test_setup
        .app_state
        .report_service()
        .save_report(anna, 2024, 1, context.clone(), None)
        .await
        .unwrap();
    test_setup
        .app_state
        .leave_request_service()
        .submit(
            anna,
            LeaveType::Vacation,
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 07),
            None,
            context,
            None,
        )
        .await
        .unwrap();

    let owned_tables = [
        "absence",
        "overtime",
        "manual_hours",
        "day_note",
        "shift_override",
        "report",
        "leave_request",
    ];
    for table in owned_tables {
        assert_eq!(test_setup.count_rows(table, anna).await, 1, "{table}");
    }

    test_setup
        .app_state
        .employee_service()
        .delete(anna, test_setup.admin(), None)
        .await
        .unwrap();

    for table in owned_tables {
        assert_eq!(test_setup.count_rows(table, anna).await, 0, "{table}");
    }
    let result = test_setup
        .app_state
        .employee_service()
        .get(anna, test_setup.admin(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::EntityNotFound(id)) if id == anna));
}
