use clap::{Parser, Subcommand};
use service::employee::Role;
use service::leave::LeaveType;
use service::rotation::{ShiftType, Team};
use service::ServiceError;
use skiftplan_utils::{parse_iso_date, DateUtilsError};
use time::Date;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "skiftplan")]
#[command(version)]
#[command(about = "Shift schedule, time reports and leave requests for rotating teams", long_about = None)]
pub struct Cli {
    /// Employee acting on this command
    #[arg(long = "as", env = "SKIFTPLAN_USER", global = true)]
    pub acting_user: Option<Uuid>,

    /// SQLite database, created if missing
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./skiftplan.sqlite3?mode=rwc",
        global = true
    )]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add an employee. The very first employee may be created without --as.
    CreateEmployee {
        name: String,
        #[arg(long, value_parser = parse_team)]
        team: Team,
        #[arg(long, value_parser = parse_role, default_value = "user")]
        role: Role,
        #[arg(long)]
        hidden: bool,
    },
    UpdateEmployee {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_team)]
        team: Option<Team>,
        #[arg(long, value_parser = parse_role)]
        role: Option<Role>,
        #[arg(long)]
        hidden: Option<bool>,
    },
    DeleteEmployee {
        id: Uuid,
    },
    ListEmployees,

    /// Show the rotation settings
    Settings,
    /// Restart the rotation: A on the date, B a week later, C two weeks later
    SetStartDate {
        #[arg(value_parser = parse_date)]
        date: Date,
    },
    SetTeam {
        #[arg(value_parser = parse_team)]
        team: Team,
        #[arg(long, value_parser = parse_date)]
        anchor: Option<Date>,
        #[arg(long)]
        name: Option<String>,
    },

    /// Month view of an employee's days
    Schedule {
        year: u32,
        month: u8,
        #[arg(long)]
        employee: Option<Uuid>,
        /// Include days without shift or records
        #[arg(long)]
        show_empty: bool,
    },
    Day {
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(long)]
        employee: Option<Uuid>,
    },

    /// Record an absence. An empty reason with zero hours removes it.
    Absence {
        #[arg(value_parser = parse_date)]
        date: Date,
        reason: String,
        hours: f32,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    Overtime {
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(long, default_value_t = 0.0)]
        mertid: f32,
        #[arg(long, default_value_t = 0.0)]
        ot50: f32,
        #[arg(long, default_value_t = 0.0)]
        ot100: f32,
        #[arg(long, default_value_t = 0.0)]
        ot200: f32,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    ManualHours {
        #[arg(value_parser = parse_date)]
        date: Date,
        hours: f32,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    Note {
        #[arg(value_parser = parse_date)]
        date: Date,
        text: String,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    /// Force DAG or NATT on a day. Without a shift the override is removed.
    ShiftOverride {
        #[arg(value_parser = parse_date)]
        date: Date,
        #[arg(value_parser = parse_shift_type)]
        shift: Option<ShiftType>,
        #[arg(long)]
        employee: Option<Uuid>,
    },

    /// Calculate and store the monthly report
    SaveReport {
        year: u32,
        month: u8,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    Report {
        year: u32,
        month: u8,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    ListReports {
        year: u32,
        month: u8,
    },
    ApproveReport {
        id: Uuid,
    },

    /// Working days and hours a leave would cover
    LeaveSpan {
        #[arg(value_parser = parse_date)]
        from: Date,
        #[arg(value_parser = parse_date)]
        to: Date,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    SubmitLeave {
        #[arg(value_parser = parse_leave_type)]
        leave_type: LeaveType,
        #[arg(value_parser = parse_date)]
        from: Date,
        #[arg(value_parser = parse_date)]
        to: Date,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    ApproveLeave {
        id: Uuid,
    },
    DenyLeave {
        id: Uuid,
        reason: String,
    },
    CancelLeave {
        id: Uuid,
    },
    ListLeave {
        #[arg(long)]
        employee: Option<Uuid>,
    },
    ListAllLeave,

    Statistics {
        year: u32,
        #[arg(long)]
        employee: Option<Uuid>,
    },
    CompanyStatistics {
        year: u32,
        #[arg(long)]
        month: Option<u8>,
    },

    /// Common phrases offered for day notes
    Phrases,
    AddPhrase {
        phrase: String,
    },
    DeletePhrase {
        id: Uuid,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateEmployee { .. } => "create-employee",
            Command::UpdateEmployee { .. } => "update-employee",
            Command::DeleteEmployee { .. } => "delete-employee",
            Command::ListEmployees => "list-employees",
            Command::Settings => "settings",
            Command::SetStartDate { .. } => "set-start-date",
            Command::SetTeam { .. } => "set-team",
            Command::Schedule { .. } => "schedule",
            Command::Day { .. } => "day",
            Command::Absence { .. } => "absence",
            Command::Overtime { .. } => "overtime",
            Command::ManualHours { .. } => "manual-hours",
            Command::Note { .. } => "note",
            Command::ShiftOverride { .. } => "shift-override",
            Command::SaveReport { .. } => "save-report",
            Command::Report { .. } => "report",
            Command::ListReports { .. } => "list-reports",
            Command::ApproveReport { .. } => "approve-report",
            Command::LeaveSpan { .. } => "leave-span",
            Command::SubmitLeave { .. } => "submit-leave",
            Command::ApproveLeave { .. } => "approve-leave",
            Command::DenyLeave { .. } => "deny-leave",
            Command::CancelLeave { .. } => "cancel-leave",
            Command::ListLeave { .. } => "list-leave",
            Command::ListAllLeave => "list-all-leave",
            Command::Statistics { .. } => "statistics",
            Command::CompanyStatistics { .. } => "company-statistics",
            Command::Phrases => "phrases",
            Command::AddPhrase { .. } => "add-phrase",
            Command::DeletePhrase { .. } => "delete-phrase",
        }
    }
}

fn parse_date(value: &str) -> Result<Date, DateUtilsError> {
    parse_iso_date(value)
}

fn parse_team(value: &str) -> Result<Team, ServiceError> {
    value.parse()
}

fn parse_role(value: &str) -> Result<Role, ServiceError> {
    value.parse()
}

fn parse_leave_type(value: &str) -> Result<LeaveType, ServiceError> {
    value.parse()
}

fn parse_shift_type(value: &str) -> Result<ShiftType, ServiceError> {
    value.parse()
}
