use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    report::{ReportDao, ReportEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    config::ConfigService,
    day_entry::DayEntryService,
    employee::EmployeeService,
    permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE},
    report::{Report, ReportService, ReportSummary, ReportTotals},
    rotation::RotationTable,
    settings::SettingsService,
    uuid_service::UuidService,
    PermissionService, ServiceError,
};
use skiftplan_utils::DateRange;
use tokio::join;
use tracing::instrument;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct ReportServiceImpl: ReportService = ReportServiceDeps {
        ReportDao: ReportDao<Transaction = Self::Transaction> = report_dao,
        DayEntryService: DayEntryService<Context = Self::Context, Transaction = Self::Transaction> = day_entry_service,
        EmployeeService: EmployeeService<Context = Self::Context, Transaction = Self::Transaction> = employee_service,
        SettingsService: SettingsService<Context = Self::Context, Transaction = Self::Transaction> = settings_service,
        ConfigService: ConfigService = config_service,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const REPORT_SERVICE_PROCESS: &str = "report-service";

impl<Deps: ReportServiceDeps> ReportServiceImpl<Deps> {
    /// Totals of a month. The plan follows the pattern only and ignores
    /// shift overrides as well as red days.
    async fn calculate_totals(
        &self,
        user_id: Uuid,
        range: DateRange,
        tx: Deps::Transaction,
    ) -> Result<ReportTotals, ServiceError> {
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

        let mut totals = ReportTotals::default();
        for absence in entries.absences.iter() {
            if absence.is_leave() {
                totals.leave += absence.hours;
            } else {
                totals.absence += absence.hours;
            }
        }
        for overtime in entries.overtime.iter() {
            totals.mertid += overtime.mertid;
            totals.ot50 += overtime.ot50;
            totals.ot100 += overtime.ot100;
            totals.ot200 += overtime.ot200;
        }
        totals.plan = range
            .iter()
            .map(|date| table.nominal_hours(employee.team, date, &settings))
            .sum();
        totals.worked = (totals.plan - totals.absence - totals.leave).max(0.0);
        tracing::debug!(%user_id, ?totals, "Calculated report totals");
        Ok(totals)
    }
}

#[async_trait]
impl<Deps: ReportServiceDeps> ReportService for ReportServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    #[instrument(skip(self))]
    async fn save_report(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let (admin, own) = join!(
            self.permission_service.check_permission(
                ADMIN_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(user_id, context.clone()),
        );
        admin.or(own)?;

        let range = DateRange::month(year as i32, month)?;
        let totals = self.calculate_totals(user_id, range, tx.clone()).await?;
        let existing = self
            .report_dao
            .find_by_user_and_month(user_id, year, month, tx.clone())
            .await?;

        let report = Report {
            id: existing
                .as_ref()
                .map(|entity| entity.id)
                .unwrap_or_else(|| self.uuid_service.new_uuid("report-id")),
            user_id,
            year,
            month,
            created: self.clock_service.date_time_now(),
            totals,
            changes: totals.has_changes(),
            approved_by: None,
            approved_at: None,
        };
        let entity = ReportEntity::from(&report);
        tracing::info!(%user_id, year, month, update = existing.is_some(), "Saving report");
        if existing.is_some() {
            self.report_dao
                .update(&entity, REPORT_SERVICE_PROCESS, tx.clone())
                .await?;
        } else {
            self.report_dao
                .create(&entity, REPORT_SERVICE_PROCESS, tx.clone())
                .await?;
        }
        self.transaction_dao.commit(tx).await?;
        Ok(report)
    }

    async fn get_report(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<Report>, ServiceError> {
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
        DateRange::month(year as i32, month)?;
        let report = self
            .report_dao
            .find_by_user_and_month(user_id, year, month, tx.clone())
            .await?
            .as_ref()
            .map(Report::from);
        self.transaction_dao.commit(tx).await?;
        Ok(report)
    }

    async fn get_reports(
        &self,
        year: u32,
        month: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(CONTROLLER_PRIVILEGE, context, tx.clone().into())
            .await?;
        let entities = match month {
            Some(month) => {
                DateRange::month(year as i32, month)?;
                self.report_dao
                    .find_by_month(year, month, tx.clone())
                    .await?
            }
            None => self.report_dao.find_by_year(year, tx.clone()).await?,
        };
        self.transaction_dao.commit(tx).await?;
        Ok(entities.iter().map(Report::from).collect())
    }

    async fn list_reports(
        &self,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[ReportSummary]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let reports = self
            .get_reports(year, Some(month), context, tx.clone().into())
            .await?;
        let employees = self
            .employee_service
            .get_all(Authentication::Full, tx.clone().into())
            .await?;

        let mut summaries: Vec<ReportSummary> = reports
            .iter()
            .filter_map(|report| {
                let employee = employees
                    .iter()
                    .find(|employee| employee.id == report.user_id && !employee.hidden)?;
                Some(ReportSummary {
                    report_id: report.id,
                    user_id: report.user_id,
                    name: employee.name.clone(),
                    team: employee.team,
                    year: report.year,
                    month: report.month,
                    totals: report.totals,
                    changes: report.changes,
                    approved: report.is_approved(),
                    approved_by: report.approved_by,
                    approved_at: report.approved_at,
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        self.transaction_dao.commit(tx).await?;
        Ok(summaries.into())
    }

    async fn approve_report(
        &self,
        report_id: Uuid,
        admin_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;
        let report = self
            .report_dao
            .find_by_id(report_id, tx.clone())
            .await?
            .as_ref()
            .map(Report::from)
            .ok_or(ServiceError::EntityNotFound(report_id))?;
        self.employee_service
            .verify_user_is_employee(admin_id, Authentication::Full, tx.clone().into())
            .await?;

        let report = Report {
            approved_by: Some(admin_id),
            approved_at: Some(self.clock_service.date_time_now()),
            ..report
        };
        self.report_dao
            .update(
                &ReportEntity::from(&report),
                REPORT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(report)
    }
}
