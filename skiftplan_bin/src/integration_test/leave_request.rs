use service::employee::Role;
use service::leave::{LeaveRequestService as _, LeaveStatus, LeaveType};
use service::permission::Authentication;
use service::rotation::Team;
use service::schedule::ScheduleService as _;
use service::ServiceError;
use time::macros::date;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_leave_lifecycle() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let context = Authentication::Context(anna);
    let leave_request_service = test_setup.app_state.leave_request_service();

    let request = leave_request_service
        .submit(
            anna,
            LeaveType::Vacation,
            date!(2024 - 01 - 01),
            date!(2024 - 01 - 07),
            Some("Fjällen".into()),
            context.clone(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(request.status, LeaveStatus::Pending);
    assert_eq!(request.days, 4);
    assert_eq!(request.hours, 48.0);

    let result = leave_request_service
        .approve(request.id, anna, context.clone(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    let approved = leave_request_service
        .approve(request.id, test_setup.admin_id, test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.decided_by, Some(test_setup.admin_id));

    let day = test_setup
        .app_state
        .schedule_service()
        .resolve_day(anna, date!(2024 - 01 - 02), context.clone(), None)
        .await
        .unwrap();
    assert_eq!(day.absence_reason.as_ref(), "Semester");
    assert_eq!(day.leave_hours, 12.0);
    assert_eq!(day.absence_hours, 0.0);
    assert_eq!(day.worked, 0.0);

    // Deciding twice is refused and cancelling a decided request changes nothing.
    let result = leave_request_service
        .deny(request.id, test_setup.admin_id, "Too late", test_setup.admin(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::LeaveRequestNotPending(_))));
    let unchanged = leave_request_service
        .cancel(request.id, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(unchanged.status, LeaveStatus::Approved);

    let requests = leave_request_service
        .list_for_user(anna, context, None)
        .await
        .unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].comment.as_deref(), Some("Fjällen"));
}

#[tokio::test]
async fn test_deny_and_cancel() {
    let test_setup = TestSetup::new().await;
    let bertil = test_setup.create_employee("Bertil", Team::B, Role::User).await;
    let context = Authentication::Context(bertil);
    let leave_request_service = test_setup.app_state.leave_request_service();

    let first = leave_request_service
        .submit(
            bertil,
            LeaveType::Comp,
            date!(2024 - 02 - 01),
            date!(2024 - 02 - 29),
            None,
            context.clone(),
            None,
        )
        .await
        .unwrap();
    let second = leave_request_service
        .submit(
            bertil,
            LeaveType::Atk,
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 31),
            None,
            context.clone(),
            None,
        )
        .await
        .unwrap();

    let denied = leave_request_service
        .deny(first.id, test_setup.admin_id, "Underbemanning", test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(denied.status, LeaveStatus::Denied);
    assert_eq!(denied.deny_reason.as_deref(), Some("Underbemanning"));

    let cancelled = leave_request_service
        .cancel(second.id, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    // Cancelled requests are no longer listed.
    let overview = leave_request_service
        .list_all(test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(overview.len(), 1);
    assert_eq!(overview[0].name.as_ref(), "Bertil");
    assert_eq!(overview[0].request.status, LeaveStatus::Denied);
}

#[tokio::test]
async fn test_leave_without_working_days() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let result = test_setup
        .app_state
        .leave_request_service()
        .submit(
            anna,
            LeaveType::Vacation,
            date!(2024 - 01 - 05),
            date!(2024 - 01 - 07),
            None,
            Authentication::Context(anna),
            None,
        )
        .await;
    assert!(matches!(
        result,
        Err(ServiceError::NoWorkingDaysInRange(_, _))
    ));
}
