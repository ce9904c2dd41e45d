use std::sync::Arc;

use async_trait::async_trait;
use dao::TransactionDao;
use service::{
    calendar::is_red_day,
    config::ConfigService,
    day_entry::{DayEntryService, DayOverrides},
    employee::EmployeeService,
    permission::{Authentication, CONTROLLER_PRIVILEGE},
    rotation::{planned_hours, RotationTable, Team},
    schedule::{DayRecord, ScheduleService},
    settings::{Settings, SettingsService},
    PermissionService, ServiceError,
};
use skiftplan_utils::{DateRange, DayOfWeek};
use time::Date;
use tokio::join;
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;

/// Resolves one day of an employee's timesheet from the pattern and the
/// records stored for that day.
pub fn compose_day(
    date: Date,
    team: Team,
    table: &RotationTable,
    settings: &Settings,
    overrides: &DayOverrides,
) -> DayRecord {
    let label = match overrides.shift_type {
        Some(shift_type) => shift_type.into(),
        None => table.resolve(team, date, settings),
    };
    let mut planned = planned_hours(team, label);

    let (absence_reason, absence_hours, leave_hours): (Arc<str>, f32, f32) =
        match &overrides.absence {
            Some(absence) if absence.is_leave() => (absence.reason.clone(), 0.0, absence.hours),
            Some(absence) => (absence.reason.clone(), absence.hours, 0.0),
            None => ("".into(), 0.0, 0.0),
        };

    let (mertid, ot50, ot100, ot200) = overrides
        .overtime
        .as_ref()
        .map(|overtime| (overtime.mertid, overtime.ot50, overtime.ot100, overtime.ot200))
        .unwrap_or_default();
    let has_overtime = overrides
        .overtime
        .as_ref()
        .is_some_and(|overtime| overtime.has_overtime());

    // A planned shift on a red day only counts when overtime was worked.
    let red_day = is_red_day(date);
    if red_day && planned > 0.0 {
        planned = if has_overtime {
            team.full_day_hours()
        } else {
            0.0
        };
    }

    let manual = overrides.manual_hours.unwrap_or(0.0);
    let worked = if manual > 0.0 {
        manual
    } else {
        (planned - absence_hours - leave_hours).max(0.0)
    };

    let note = overrides.note.clone().unwrap_or_else(|| "".into());
    let has_activity = planned > 0.0
        || worked > 0.0
        || absence_hours > 0.0
        || leave_hours > 0.0
        || has_overtime
        || !note.is_empty();

    let weekday = DayOfWeek::from(date.weekday());
    DayRecord {
        date,
        weekday: weekday.local_name(),
        label,
        planned,
        worked,
        absence_reason,
        absence_hours,
        leave_hours,
        mertid,
        ot50,
        ot100,
        ot200,
        note,
        is_weekend: weekday.is_weekend(),
        is_red_day: red_day,
        has_activity,
    }
}

gen_service_impl! {
    struct ScheduleServiceImpl: ScheduleService = ScheduleServiceDeps {
        DayEntryService: DayEntryService<Context = Self::Context, Transaction = Self::Transaction> = day_entry_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        SettingsService: SettingsService<Context = Self::Context, Transaction = Self::Transaction> = settings_service,
        ConfigService: ConfigService = config_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

impl<Deps: ScheduleServiceDeps> ScheduleServiceImpl<Deps> {
    async fn resolve_range(
        &self,
        user_id: Uuid,
        range: DateRange,
        context: Authentication<Deps::Context>,
        tx: Deps::Transaction,
    ) -> Result<Vec<DayRecord>, ServiceError> {
        let (controller, own) = join!(
            self.permission_service.check_permission(
                CONTROLLER_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(user_id, context.clone()),
        );
        controller.or(own)?;

        let employee = self
            .employee_service
            .get(user_id, Authentication::Full, tx.clone().into())
            .await?;
        let settings = self
            .settings_service
            .get_settings(Authentication::Full, tx.clone().into())
            .await?;
        let table = RotationTable::new(self.config_service.get_config().await?.rotation_variant);
        let entries = self
            .day_entry_service
            .get_day_entries(user_id, range, Authentication::Full, tx.into())
            .await?;

        Ok(range
            .iter()
            .map(|date| {
                compose_day(
                    date,
                    employee.team,
                    &table,
                    &settings,
                    &entries.for_date(date),
                )
            })
            .collect())
    }
}

#[async_trait]
impl<Deps: ScheduleServiceDeps> ScheduleService for ScheduleServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self))]
    async fn get_schedule(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        show_empty: bool,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[DayRecord]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let range = DateRange::month(year as i32, month)?;
        let days = self
            .resolve_range(user_id, range, context, tx.clone())
            .await?
            .into_iter()
            .filter(|day| show_empty || day.has_activity)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(days)
    }

    async fn resolve_day(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DayRecord, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let day = self
            .resolve_range(user_id, DateRange::single(date), context, tx.clone())
            .await?
            .pop()
            .ok_or(ServiceError::InternalError)?;
        self.transaction_dao.commit(tx).await?;
        Ok(day)
    }
}
