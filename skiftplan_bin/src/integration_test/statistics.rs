use service::day_entry::{Absence, DayEntryService as _};
use service::employee::Role;
use service::permission::Authentication;
use service::report::ReportService as _;
use service::rotation::Team;
use service::statistics::StatisticsService as _;
use time::macros::date;

use crate::integration_test::TestSetup;

#[tokio::test]
async fn test_statistics() {
    let test_setup = TestSetup::new().await;
    let anna = test_setup.create_employee("Anna", Team::A, Role::User).await;
    let context = Authentication::Context(anna);
    let statistics_service = test_setup.app_state.statistics_service();

    for (date, reason) in [
        (date!(2024 - 01 - 03), "Sjuk"),
        (date!(2024 - 01 - 04), "Sjuk"),
        (date!(2024 - 01 - 10), "Semester"),
    ] {
        test_setup
            .app_state
            .day_entry_service()
            .save_absence(
                &Absence {
                    user_id: anna,
                    date,
                    reason: reason.into(),
                    hours: 12.0,
                },
                context.clone(),
                None,
            )
            .await
            .unwrap();
    }

    let statistics = statistics_service
        .get_statistics(anna, 2024, context.clone(), None)
        .await
        .unwrap();
    assert_eq!(statistics.total_absence, 36.0);
    assert_eq!(statistics.sick_hours, 24.0);
    assert_eq!(statistics.leave_hours, 12.0);
    assert_eq!(statistics.absence_by_month[&1]["Sjuk"], 24.0);

    // Without reports nothing counts as worked.
    let company = statistics_service
        .get_company_statistics(2024, Some(1), test_setup.admin(), None)
        .await
        .unwrap();
    assert_eq!(company.total_worked, 0.0);
    assert_eq!(company.sick_hours, 24.0);
    assert_eq!(company.sick_percent, 0.0);

    test_setup
        .app_state
        .report_service()
        .save_report(anna, 2024, 1, context, None)
        .await
        .unwrap();
    let company = statistics_service
        .get_company_statistics(2024, Some(1), test_setup.admin(), None)
        .await
        .unwrap();
    // 168 planned hours minus 24 sick and 12 leave.
    assert_eq!(company.total_worked, 132.0);
    assert!((company.sick_percent - 24.0 / 132.0 * 100.0).abs() < 1e-3);
    assert_eq!(company.top_absence[0].name.as_ref(), "Anna");
    assert_eq!(company.user_count, 2);
}
