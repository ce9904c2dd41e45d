use std::sync::Arc;

use async_trait::async_trait;
use dao::TransactionDao;
use service::{
    day_entry::DayEntryService,
    employee::{Employee, EmployeeService},
    permission::{Authentication, CONTROLLER_PRIVILEGE},
    report::{ReportService, ReportTotals},
    statistics::{
        sick_percent, team_statistics, top_entries, CompanyStatistics, EmployeeStatistics,
        OvertimeTotals, StatisticsService, UserStatistics,
    },
    PermissionService, ServiceError,
};
use skiftplan_utils::DateRange;
use tokio::join;
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct StatisticsServiceImpl: StatisticsService = StatisticsServiceDeps {
        DayEntryService: DayEntryService<Context = Self::Context, Transaction = Self::Transaction> = day_entry_service,
        ReportService: ReportService<Context = Self::Context, Transaction = Self::Transaction> = report_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: StatisticsServiceDeps> StatisticsService for StatisticsServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_statistics(
        &self,
        user_id: Uuid,
        year: u32,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<UserStatistics, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let (controller, own) = join!(
            self.permission_service.check_permission(
                CONTROLLER_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(user_id, context.clone()),
        );
        controller.or(own)?;

        let entries = self
            .day_entry_service
            .get_day_entries(
                user_id,
                DateRange::year(year as i32)?,
                Authentication::Full,
                tx.clone().into(),
            )
            .await?;

        let mut statistics = UserStatistics {
            year,
            ..Default::default()
        };
        for absence in entries.absences.iter() {
            *statistics
                .absence_by_month
                .entry(absence.date.month() as u8)
                .or_default()
                .entry(absence.reason.clone())
                .or_default() += absence.hours;
            statistics.total_absence += absence.hours;
            if absence.is_sick() {
                statistics.sick_hours += absence.hours;
            }
            if absence.is_leave() {
                statistics.leave_hours += absence.hours;
            }
        }
        for overtime in entries.overtime.iter() {
            let totals = OvertimeTotals {
                mertid: overtime.mertid,
                ot50: overtime.ot50,
                ot100: overtime.ot100,
                ot200: overtime.ot200,
            };
            *statistics
                .overtime_by_month
                .entry(overtime.date.month() as u8)
                .or_default() += &totals;
            statistics.total_overtime += totals.total();
        }

        self.transaction_dao.commit(tx).await?;
        Ok(statistics)
    }

    #[instrument(skip(self))]
    async fn get_company_statistics(
        &self,
        year: u32,
        month: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<CompanyStatistics, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(CONTROLLER_PRIVILEGE, context, tx.clone().into())
            .await?;
        let range = match month {
            Some(month) => DateRange::month(year as i32, month)?,
            None => DateRange::year(year as i32)?,
        };

        let mut employees: Vec<Employee> = self
            .employee_service
            .get_all(Authentication::Full, tx.clone().into())
            .await?
            .iter()
            .filter(|employee| !employee.hidden)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name));
        let reports = self
            .report_service
            .get_reports(year, month, Authentication::Full, tx.clone().into())
            .await?;
        let absences = self
            .day_entry_service
            .get_absences_for_all(range, Authentication::Full, tx.clone().into())
            .await?;

        let users: Vec<EmployeeStatistics> = employees
            .iter()
            .map(|employee| {
                let mut totals = ReportTotals::default();
                reports
                    .iter()
                    .filter(|report| report.user_id == employee.id)
                    .for_each(|report| totals += &report.totals);
                EmployeeStatistics {
                    user_id: employee.id,
                    name: employee.name.clone(),
                    team: employee.team,
                    worked: totals.worked,
                    absence: totals.absence,
                    leave: totals.leave,
                    overtime: totals.overtime(),
                }
            })
            .collect();
        let sick_hours: f32 = absences
            .iter()
            .filter(|absence| absence.is_sick())
            .filter(|absence| employees.iter().any(|employee| employee.id == absence.user_id))
            .map(|absence| absence.hours)
            .sum();

        let total_worked: f32 = users.iter().map(|user| user.worked).sum();
        let statistics = CompanyStatistics {
            year,
            month,
            total_worked,
            total_absence: users.iter().map(|user| user.absence).sum(),
            total_leave: users.iter().map(|user| user.leave).sum(),
            total_overtime: users.iter().map(|user| user.overtime).sum(),
            sick_hours,
            sick_percent: sick_percent(sick_hours, total_worked),
            user_count: users.len() as u32,
            by_team: team_statistics(&users),
            top_worked: top_entries(&users, |user| user.worked),
            top_absence: top_entries(&users, |user| user.absence),
            top_overtime: top_entries(&users, |user| user.overtime),
            users: Arc::from(users),
        };
        self.transaction_dao.commit(tx).await?;
        Ok(statistics)
    }
}
