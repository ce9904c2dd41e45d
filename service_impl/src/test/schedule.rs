use crate::schedule::{compose_day, ScheduleServiceDeps, ScheduleServiceImpl};
use crate::test::error_test::*;
use dao::{MockTransaction, MockTransactionDao};
use service::config::{Config, MockConfigService};
use service::day_entry::{
    Absence, DayEntries, DayNote, DayOverrides, ManualHours, MockDayEntryService, Overtime,
    ShiftOverride,
};
use service::employee::{Employee, MockEmployeeService, Role};
use service::rotation::{RotationTable, RotationVariant, ShiftLabel, ShiftType, Team};
use service::schedule::ScheduleService;
use service::settings::{MockSettingsService, Settings};
use service::{MockPermissionService, ServiceError};
use time::macros::date;
use time::Date;

fn settings() -> Settings {
    Settings::with_start_date(date!(2024 - 01 - 01))
}

fn absence(date: Date, reason: &str, hours: f32) -> Absence {
    Absence {
        user_id: current_user_id(),
        date,
        reason: reason.into(),
        hours,
    }
}

fn overtime(date: Date, ot50: f32) -> Overtime {
    Overtime {
        user_id: current_user_id(),
        date,
        mertid: 0.0,
        ot50,
        ot100: 0.0,
        ot200: 0.0,
    }
}

fn compose(date: Date, team: Team, overrides: &DayOverrides) -> service::schedule::DayRecord {
    compose_day(date, team, &RotationTable::default(), &settings(), overrides)
}

#[test]
fn test_plain_pattern_day() {
    let day = compose(date!(2024 - 01 - 03), Team::A, &DayOverrides::default());
    assert_eq!(day.label, ShiftLabel::Night);
    assert_eq!(day.planned, 12.0);
    assert_eq!(day.worked, 12.0);
    assert_eq!(day.weekday, "Onsdag");
    assert!(!day.is_weekend);
    assert!(day.has_activity);
}

#[test]
fn test_free_day_has_no_activity() {
    let day = compose(date!(2024 - 01 - 17), Team::A, &DayOverrides::default());
    assert_eq!(day.label, ShiftLabel::Off);
    assert_eq!(day.planned, 0.0);
    assert_eq!(day.worked, 0.0);
    assert!(!day.has_activity);
}

#[test]
fn test_red_day_with_overtime_keeps_full_day() {
    // 2024-12-25 is a Wednesday in week 0 of team A's cycle.
    let date = date!(2024 - 12 - 25);
    let overrides = DayOverrides {
        shift_type: Some(ShiftType::Day),
        overtime: Some(overtime(date, 4.0)),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert!(day.is_red_day);
    assert_eq!(day.label, ShiftLabel::Day);
    assert_eq!(day.planned, 12.0);
    assert_eq!(day.ot50, 4.0);

    let overrides = DayOverrides {
        shift_type: Some(ShiftType::Day),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert_eq!(day.planned, 0.0);
    assert_eq!(day.worked, 0.0);
}

#[test]
fn test_leave_reason_counts_as_leave() {
    let date = date!(2024 - 01 - 03);
    let overrides = DayOverrides {
        absence: Some(absence(date, "Semester", 12.0)),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert_eq!(day.absence_reason.as_ref(), "Semester");
    assert_eq!(day.absence_hours, 0.0);
    assert_eq!(day.leave_hours, 12.0);
    assert_eq!(day.worked, 0.0);

    let overrides = DayOverrides {
        absence: Some(absence(date, "Sjuk", 4.0)),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert_eq!(day.absence_hours, 4.0);
    assert_eq!(day.leave_hours, 0.0);
    assert_eq!(day.worked, 8.0);
}

#[test]
fn test_worked_is_never_negative() {
    let date = date!(2024 - 01 - 17);
    let overrides = DayOverrides {
        absence: Some(absence(date, "Sjuk", 12.0)),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert_eq!(day.planned, 0.0);
    assert_eq!(day.worked, 0.0);
    assert!(day.has_activity);
}

#[test]
fn test_manual_hours_replace_worked() {
    let date = date!(2024 - 01 - 03);
    let overrides = DayOverrides {
        absence: Some(absence(date, "Sjuk", 12.0)),
        manual_hours: Some(5.5),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert_eq!(day.worked, 5.5);
}

#[test]
fn test_override_on_team_d() {
    let date = date!(2024 - 01 - 13);
    let day = compose(date, Team::D, &DayOverrides::default());
    assert_eq!(day.label, ShiftLabel::Off);
    assert!(day.is_weekend);
    assert_eq!(day.weekday, "Lördag");

    let overrides = DayOverrides {
        shift_type: Some(ShiftType::Day),
        ..Default::default()
    };
    let day = compose(date, Team::D, &overrides);
    assert_eq!(day.planned, 8.0);

    let overrides = DayOverrides {
        shift_type: Some(ShiftType::Night),
        ..Default::default()
    };
    let day = compose(date, Team::D, &overrides);
    assert_eq!(day.label, ShiftLabel::Night);
    assert_eq!(day.planned, 0.0);
}

#[test]
fn test_note_marks_activity() {
    let date = date!(2024 - 01 - 17);
    let overrides = DayOverrides {
        note: Some("Kurs".into()),
        ..Default::default()
    };
    let day = compose(date, Team::A, &overrides);
    assert!(day.has_activity);
    assert_eq!(day.note.as_ref(), "Kurs");
}

#[test]
fn test_leave_module_table() {
    let table = RotationTable::new(RotationVariant::LeaveModule);
    let day = compose_day(
        date!(2024 - 01 - 05),
        Team::A,
        &table,
        &settings(),
        &DayOverrides::default(),
    );
    assert_eq!(day.label, ShiftLabel::Night);
}

pub struct ScheduleServiceDependencies {
    pub day_entry_service: MockDayEntryService,
    pub employee_service: MockEmployeeService,
    pub settings_service: MockSettingsService,
    pub config_service: MockConfigService,
    pub permission_service: MockPermissionService,
}
impl ScheduleServiceDeps for ScheduleServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type DayEntryService = MockDayEntryService;
    type EmployeeService = MockEmployeeService;
    type SettingsService = MockSettingsService;
    type ConfigService = MockConfigService;
    type PermissionService = MockPermissionService;
    type TransactionDao = MockTransactionDao;
}
impl ScheduleServiceDependencies {
    pub fn build_service(self) -> ScheduleServiceImpl<ScheduleServiceDependencies> {
        ScheduleServiceImpl {
            day_entry_service: self.day_entry_service.into(),
            employee_service: self.employee_service.into(),
            settings_service: self.settings_service.into(),
            config_service: self.config_service.into(),
            permission_service: self.permission_service.into(),
            transaction_dao: build_transaction_dao().into(),
        }
    }
}

fn build_dependencies(entries: DayEntries) -> ScheduleServiceDependencies {
    let mut employee_service = MockEmployeeService::new();
    employee_service.expect_get().returning(|id, _, _| {
        Ok(Employee {
            id,
            name: "Anna".into(),
            team: Team::A,
            role: Role::User,
            hidden: false,
            created: Some(generate_default_datetime()),
        })
    });
    let mut settings_service = MockSettingsService::new();
    settings_service
        .expect_get_settings()
        .returning(|_, _| Ok(settings()));
    let mut config_service = MockConfigService::new();
    config_service.expect_get_config().returning(|| {
        Ok(Config {
            rotation_variant: RotationVariant::Standard,
        })
    });
    let mut day_entry_service = MockDayEntryService::new();
    day_entry_service
        .expect_get_day_entries()
        .returning(move |_, _, _, _| Ok(entries.clone()));
    ScheduleServiceDependencies {
        day_entry_service,
        employee_service,
        settings_service,
        config_service,
        permission_service: build_permission_service(&[]),
    }
}

#[tokio::test]
async fn test_get_schedule_show_empty() {
    let service = build_dependencies(DayEntries::default()).build_service();
    let days = service
        .get_schedule(current_user_id(), 2024, 1, true, ().auth(), None)
        .await
        .unwrap();
    assert_eq!(days.len(), 31);
    assert_eq!(days[0].date, date!(2024 - 01 - 01));
    assert_eq!(days[30].date, date!(2024 - 01 - 31));
    assert!(days.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(days[0].label, ShiftLabel::Day);
    assert!(days[0].is_red_day);
    assert_eq!(days[2].label, ShiftLabel::Night);
    assert_eq!(days[2].planned, 12.0);
    assert_eq!(days[16].label, ShiftLabel::Off);
    assert_eq!(days[16].planned, 0.0);
}

#[tokio::test]
async fn test_get_schedule_drops_inactive_days() {
    let entries = DayEntries {
        notes: [DayNote {
            user_id: current_user_id(),
            date: date!(2024 - 01 - 17),
            note: "Utbildning".into(),
        }]
        .into(),
        manual_hours: [ManualHours {
            user_id: current_user_id(),
            date: date!(2024 - 01 - 20),
            hours: 3.0,
        }]
        .into(),
        shift_overrides: [ShiftOverride {
            user_id: current_user_id(),
            date: date!(2024 - 01 - 21),
            shift_type: Some(ShiftType::Day),
        }]
        .into(),
        ..Default::default()
    };
    let service = build_dependencies(entries).build_service();
    let days = service
        .get_schedule(current_user_id(), 2024, 1, false, ().auth(), None)
        .await
        .unwrap();
    let dates: Vec<Date> = days.iter().map(|day| day.date).collect();
    // Jan 1 is a red day without overtime and therefore dropped.
    assert_eq!(
        dates,
        vec![
            date!(2024 - 01 - 02),
            date!(2024 - 01 - 03),
            date!(2024 - 01 - 04),
            date!(2024 - 01 - 10),
            date!(2024 - 01 - 11),
            date!(2024 - 01 - 12),
            date!(2024 - 01 - 15),
            date!(2024 - 01 - 16),
            date!(2024 - 01 - 17),
            date!(2024 - 01 - 20),
            date!(2024 - 01 - 21),
            date!(2024 - 01 - 22),
            date!(2024 - 01 - 23),
            date!(2024 - 01 - 24),
            date!(2024 - 01 - 25),
            date!(2024 - 01 - 31),
        ]
    );
}

#[tokio::test]
async fn test_get_schedule_invalid_month() {
    let service = build_dependencies(DayEntries::default()).build_service();
    let result = service
        .get_schedule(current_user_id(), 2024, 13, true, ().auth(), None)
        .await;
    assert!(matches!(result, Err(ServiceError::ValidationError(_))));
}

#[tokio::test]
async fn test_get_schedule_of_other_user_forbidden() {
    let service = build_dependencies(DayEntries::default()).build_service();
    let result = service
        .get_schedule(other_user_id(), 2024, 1, true, ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_resolve_day() {
    let service = build_dependencies(DayEntries::default()).build_service();
    let day = service
        .resolve_day(current_user_id(), date!(2024 - 01 - 03), ().auth(), None)
        .await
        .unwrap();
    assert_eq!(day.label, ShiftLabel::Night);
    assert_eq!(day.planned, 12.0);
}
