
mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use dao_impl_sqlite::{
    absence::AbsenceDaoImpl, day_note::DayNoteDaoImpl, employee::EmployeeDaoImpl,
    leave_request::LeaveRequestDaoImpl, manual_hours::ManualHoursDaoImpl,
    overtime::OvertimeDaoImpl, phrase::PhraseDaoImpl, report::ReportDaoImpl, settings::SettingsDaoImpl,
    shift_override::ShiftOverrideDaoImpl, TransactionDaoImpl, TransactionImpl,
};
use service::ServiceError;
use service_impl::{
    day_entry::DayEntryServiceDeps, employee::EmployeeServiceDeps,
    leave_request::LeaveRequestServiceDeps, permission::PermissionServiceDeps,
    phrase::PhraseServiceDeps,
    report::ReportServiceDeps, schedule::ScheduleServiceDeps, settings::SettingsServiceDeps,
    statistics::StatisticsServiceDeps,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use thiserror::Error;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;
use uuid::Uuid;

use crate::cli::Cli;

type Context = Uuid;
type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type EmployeeDao = EmployeeDaoImpl;
type SettingsDao = SettingsDaoImpl;
type AbsenceDao = AbsenceDaoImpl;
type OvertimeDao = OvertimeDaoImpl;
type ManualHoursDao = ManualHoursDaoImpl;
type DayNoteDao = DayNoteDaoImpl;
type ShiftOverrideDao = ShiftOverrideDaoImpl;
type ReportDao = ReportDaoImpl;
type LeaveRequestDao = LeaveRequestDaoImpl;
type PhraseDao = PhraseDaoImpl;

type UserService = service_impl::UserServiceImpl;
type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type ConfigService = service_impl::config::ConfigServiceImpl;

pub struct PermissionServiceDependencies;
impl PermissionServiceDeps for PermissionServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type EmployeeDao = EmployeeDao;
    type UserService = UserService;
    type TransactionDao = TransactionDao;
}
type PermissionService = service_impl::PermissionServiceImpl<PermissionServiceDependencies>;

pub struct SettingsServiceDependencies;
impl SettingsServiceDeps for SettingsServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type SettingsDao = SettingsDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type TransactionDao = TransactionDao;
}
type SettingsService = service_impl::settings::SettingsServiceImpl<SettingsServiceDependencies>;

pub struct EmployeeServiceDependencies;
impl EmployeeServiceDeps for EmployeeServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type EmployeeDao = EmployeeDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type EmployeeService = service_impl::employee::EmployeeServiceImpl<EmployeeServiceDependencies>;

pub struct DayEntryServiceDependencies;
impl DayEntryServiceDeps for DayEntryServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type AbsenceDao = AbsenceDao;
    type OvertimeDao = OvertimeDao;
    type ManualHoursDao = ManualHoursDao;
    type DayNoteDao = DayNoteDao;
    type ShiftOverrideDao = ShiftOverrideDao;
    type EmployeeService = EmployeeService;
    type PermissionService = PermissionService;
    type TransactionDao = TransactionDao;
}
type DayEntryService = service_impl::day_entry::DayEntryServiceImpl<DayEntryServiceDependencies>;

pub struct ScheduleServiceDependencies;
impl ScheduleServiceDeps for ScheduleServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type DayEntryService = DayEntryService;
    type EmployeeService = EmployeeService;
    type SettingsService = SettingsService;
    type ConfigService = ConfigService;
    type PermissionService = PermissionService;
    type TransactionDao = TransactionDao;
}
type ScheduleService = service_impl::schedule::ScheduleServiceImpl<ScheduleServiceDependencies>;

pub struct ReportServiceDependencies;
impl ReportServiceDeps for ReportServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type ReportDao = ReportDao;
    type DayEntryService = DayEntryService;
    type EmployeeService = EmployeeService;
    type SettingsService = SettingsService;
    type ConfigService = ConfigService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type ReportService = service_impl::report::ReportServiceImpl<ReportServiceDependencies>;

pub struct LeaveRequestServiceDependencies;
impl LeaveRequestServiceDeps for LeaveRequestServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type LeaveRequestDao = LeaveRequestDao;
    type DayEntryService = DayEntryService;
    type EmployeeService = EmployeeService;
    type SettingsService = SettingsService;
    type ConfigService = ConfigService;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type LeaveRequestService =
    service_impl::leave_request::LeaveRequestServiceImpl<LeaveRequestServiceDependencies>;

pub struct StatisticsServiceDependencies;
impl StatisticsServiceDeps for StatisticsServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type DayEntryService = DayEntryService;
    type ReportService = ReportService;
    type EmployeeService = EmployeeService;
    type PermissionService = PermissionService;
    type TransactionDao = TransactionDao;
}
type StatisticsService =
    service_impl::statistics::StatisticsServiceImpl<StatisticsServiceDependencies>;

pub struct PhraseServiceDependencies;
impl PhraseServiceDeps for PhraseServiceDependencies {
    type Context = Context;
    type Transaction = Transaction;
    type PhraseDao = PhraseDao;
    type PermissionService = PermissionService;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type TransactionDao = TransactionDao;
}
type PhraseService = service_impl::phrase::PhraseServiceImpl<PhraseServiceDependencies>;

#[derive(Clone)]
pub struct AppState {
    settings_service: Arc<SettingsService>,
    employee_service: Arc<EmployeeService>,
    day_entry_service: Arc<DayEntryService>,
    schedule_service: Arc<ScheduleService>,
    report_service: Arc<ReportService>,
    leave_request_service: Arc<LeaveRequestService>,
    statistics_service: Arc<StatisticsService>,
    phrase_service: Arc<PhraseService>,
}

impl AppState {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let employee_dao = Arc::new(EmployeeDao::new(pool.clone()));

        let user_service = Arc::new(service_impl::UserServiceImpl);
        let clock_service = Arc::new(service_impl::clock::ClockServiceImpl);
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);
        let config_service = Arc::new(service_impl::config::ConfigServiceImpl);
        let permission_service = Arc::new(service_impl::PermissionServiceImpl {
            employee_dao: employee_dao.clone(),
            user_service,
            transaction_dao: transaction_dao.clone(),
        });
        let settings_service = Arc::new(service_impl::settings::SettingsServiceImpl {
            settings_dao: Arc::new(SettingsDao::new(pool.clone())),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let employee_service = Arc::new(service_impl::employee::EmployeeServiceImpl {
            employee_dao,
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let day_entry_service = Arc::new(service_impl::day_entry::DayEntryServiceImpl {
            absence_dao: Arc::new(AbsenceDao::new(pool.clone())),
            overtime_dao: Arc::new(OvertimeDao::new(pool.clone())),
            manual_hours_dao: Arc::new(ManualHoursDao::new(pool.clone())),
            day_note_dao: Arc::new(DayNoteDao::new(pool.clone())),
            shift_override_dao: Arc::new(ShiftOverrideDao::new(pool.clone())),
            employee_service: employee_service.clone(),
            permission_service: permission_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let schedule_service = Arc::new(service_impl::schedule::ScheduleServiceImpl {
            day_entry_service: day_entry_service.clone(),
            employee_service: employee_service.clone(),
            settings_service: settings_service.clone(),
            config_service: config_service.clone(),
            permission_service: permission_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let report_service = Arc::new(service_impl::report::ReportServiceImpl {
            report_dao: Arc::new(ReportDao::new(pool.clone())),
            day_entry_service: day_entry_service.clone(),
            employee_service: employee_service.clone(),
            settings_service: settings_service.clone(),
            config_service: config_service.clone(),
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let leave_request_service = Arc::new(service_impl::leave_request::LeaveRequestServiceImpl {
            leave_request_dao: Arc::new(LeaveRequestDao::new(pool.clone())),
            day_entry_service: day_entry_service.clone(),
            employee_service: employee_service.clone(),
            settings_service: settings_service.clone(),
            config_service,
            permission_service: permission_service.clone(),
            clock_service: clock_service.clone(),
            uuid_service: uuid_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let statistics_service = Arc::new(service_impl::statistics::StatisticsServiceImpl {
            day_entry_service: day_entry_service.clone(),
            report_service: report_service.clone(),
            employee_service: employee_service.clone(),
            permission_service: permission_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let phrase_service = Arc::new(service_impl::phrase::PhraseServiceImpl {
            phrase_dao: Arc::new(PhraseDao::new(pool)),
            permission_service,
            clock_service,
            uuid_service,
            transaction_dao,
        });

        Self {
            settings_service,
            employee_service,
            day_entry_service,
            schedule_service,
            report_service,
            leave_request_service,
            statistics_service,
            phrase_service,
        }
    }

    pub fn settings_service(&self) -> Arc<SettingsService> {
        self.settings_service.clone()
    }
    pub fn employee_service(&self) -> Arc<EmployeeService> {
        self.employee_service.clone()
    }
    pub fn day_entry_service(&self) -> Arc<DayEntryService> {
        self.day_entry_service.clone()
    }
    pub fn schedule_service(&self) -> Arc<ScheduleService> {
        self.schedule_service.clone()
    }
    pub fn report_service(&self) -> Arc<ReportService> {
        self.report_service.clone()
    }
    pub fn leave_request_service(&self) -> Arc<LeaveRequestService> {
        self.leave_request_service.clone()
    }
    pub fn statistics_service(&self) -> Arc<StatisticsService> {
        self.statistics_service.clone()
    }
    pub fn phrase_service(&self) -> Arc<PhraseService> {
        self.phrase_service.clone()
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("No acting employee. Pass --as or set SKIFTPLAN_USER")]
    NoActingUser,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Could not render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub async fn connect(database_url: &str) -> Result<Arc<SqlitePool>, CliError> {
    // Nested service calls share one transaction, a single connection is enough.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(database_url)
        .await?;
    sqlx::migrate!("../migrations/sqlite").run(&pool).await?;
    Ok(Arc::new(pool))
}

async fn execute(cli: Cli) -> Result<String, CliError> {
    let pool = connect(&cli.database_url).await?;
    let state = AppState::new(pool);
    let output = commands::run(&state, cli.acting_user, cli.command).await?;
    Ok(serde_json::to_string_pretty(&output)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(std::io::stderr)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing::debug!("Skiftplan version {}, running {}", version, cli.command.name());

    match execute(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
