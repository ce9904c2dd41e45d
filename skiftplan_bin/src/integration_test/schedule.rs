use service::day_entry::{Absence, DayEntryService as _, ShiftOverride};
use service::employee::Role;
use service::leave::LeaveRequestService as _;
use service::permission::Authentication;
use service::rotation::{ShiftLabel, ShiftType, Team};
use service::schedule::ScheduleService as _;
use service::ServiceError;
use time::macros::date;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_team_a_in_january() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let context = Authentication::Context(anna);

    let days = test_setup
        .app_state
        .schedule_service()
        .get_schedule(anna, 2024, 1, true, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(days.len(), 31);

    // New Year's Day is a day shift on a red day.
    assert_eq!(days[0].label, ShiftLabel::Day);
    assert!(days[0].is_red_day);
    assert_eq!(days[0].planned, 0.0);
    assert_eq!(days[0].weekday, "Måndag");

    assert_eq!(days[2].label, ShiftLabel::Night);
    assert_eq!(days[2].planned, 12.0);
    assert_eq!(days[2].worked, 12.0);

    assert_eq!(days[16].date, date!(2024 - 01 - 17));
    assert_eq!(days[16].label, ShiftLabel::Off);
    assert_eq!(days[16].planned, 0.0);

    // The pattern alone still counts the red day.
    let span = test_setup
        .app_state
        .leave_request_service()
        .calculate_span(anna, date!(2024 - 01 - 01), date!(2024 - 01 - 07), context, None)
        .await
        .unwrap();
    assert_eq!(span.days, 4);
    assert_eq!(span.hours, 48.0);
}

#[tokio::test]
async fn test_records_change_the_day() {
    let test_setup = TestSetup::new().await;
    let bertil = test_setup.create_employee("Bertil", Team::A, Role::User).await;
    let context = Authentication::Context(bertil);
    let day_entry_service = test_setup.app_state.day_entry_service();

    day_entry_service
        .save_absence(
            &Absence {
                user_id: bertil,
                date: date!(2024 - 01 - 03),
                reason: "Sjuk".into(),
                hours: 4.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    day_entry_service
        .save_shift_override(
            &ShiftOverride {
                user_id: bertil,
                date: date!(2024 - 01 - 17),
                shift_type: Some(ShiftType::Day),
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();

    let schedule_service = test_setup.app_state.schedule_service();
    let sick_day = schedule_service
        .resolve_day(bertil, date!(2024 - 01 - 03), context.clone(), None)
        .await
        .unwrap();
    assert_eq!(sick_day.absence_reason.as_ref(), "Sjuk");
    assert_eq!(sick_day.absence_hours, 4.0);
    assert_eq!(sick_day.worked, 8.0);

    let moved_day = schedule_service
        .resolve_day(bertil, date!(2024 - 01 - 17), context.clone(), None)
        .await
        .unwrap();
    assert_eq!(moved_day.label, ShiftLabel::Day);
    assert_eq!(moved_day.planned, 12.0);

    // An empty absence removes the stored one.
    day_entry_service
        .save_absence(
            &Absence {
                user_id: bertil,
                date: date!(2024 - 01 - 03),
                reason: "".into(),
                hours: 0.0,
            },
            context.clone(),
            None,
        )
        .await
        .unwrap();
    let entries = day_entry_service
        .get_day_entries(
            bertil,
            skiftplan_utils::DateRange::month(2024, 1).unwrap(),
            context,
            None,
        )
        .await
        .unwrap();
    assert!(entries.absences.is_empty());
    assert_eq!(entries.shift_overrides.len(), 1);
}

#[tokio::test]
async fn test_schedule_of_colleague_is_forbidden() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let bertil = test_setup.create_employee("Bertil", Team::B, Role::User).await;
    let controller = test_setup
        .create_employee("Cecilia", Team::D, Role::Controller)
        .await;
    let schedule_service = test_setup.app_state.schedule_service();

    let result = schedule_service
        .get_schedule(bertil, 2024, 1, false, Authentication::Context(anna), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let days = schedule_service
        .get_schedule(bertil, 2024, 1, false, Authentication::Context(controller), None)
        .await
        .unwrap();
    assert!(days.iter().all(|day| day.has_activity));
}
