use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use service::day_entry::{
    Absence, DayEntryService as _, DayNote, ManualHours, Overtime, ShiftOverride,
};
use service::employee::{Employee, EmployeeService as _, EmployeeUpdate};
use service::leave::LeaveRequestService as _;
use service::permission::Authentication;
use service::phrase::PhraseService as _;
use service::report::ReportService as _;
use service::rotation::Team;
use service::schedule::ScheduleService as _;
use service::settings::{Settings, SettingsService as _, TeamSetting};
use service::statistics::StatisticsService as _;
use time::Date;
use uuid::Uuid;

use crate::cli::Command;
use crate::{AppState, CliError};

fn to_json<T: Serialize>(value: &T) -> Result<Value, CliError> {
    Ok(serde_json::to_value(value)?)
}

fn acting(acting_user: Option<Uuid>) -> Result<Uuid, CliError> {
    acting_user.ok_or(CliError::NoActingUser)
}

/// Shows the day after one of its records changed.
async fn resolved_day(
    state: &AppState,
    user_id: Uuid,
    date: Date,
    context: Authentication<Uuid>,
) -> Result<Value, CliError> {
    let day = state
        .schedule_service()
        .resolve_day(user_id, date, context, None)
        .await?;
    to_json(&day)
}

/// Settings with one team changed and every other team kept as it is.
fn with_team(
    settings: &Settings,
    team: Team,
    anchor: Option<Date>,
    name: Option<String>,
) -> Settings {
    let teams = Team::ALL
        .iter()
        .map(|current| {
            let existing = TeamSetting {
                team: *current,
                anchor_date: settings
                    .teams
                    .iter()
                    .find(|setting| setting.team == *current)
                    .and_then(|setting| setting.anchor_date),
                name: settings.team_name(*current),
            };
            if *current != team {
                return existing;
            }
            TeamSetting {
                anchor_date: anchor.or(existing.anchor_date),
                name: name.clone().map(Arc::from).unwrap_or_else(|| existing.name.clone()),
                ..existing
            }
        })
        .collect();
    Settings {
        start_date: settings.start_date,
        teams,
    }
}

pub async fn run(
    state: &AppState,
    acting_user: Option<Uuid>,
    command: Command,
) -> Result<Value, CliError> {
    let context = || acting(acting_user).map(Authentication::Context);
    let target = |employee: Option<Uuid>| employee.or(acting_user).ok_or(CliError::NoActingUser);

    match command {
        Command::CreateEmployee {
            name,
            team,
            role,
            hidden,
        } => {
            let employee_service = state.employee_service();
            let first_start = employee_service
                .get_all(Authentication::Full, None)
                .await?
                .is_empty();
            let context = if first_start {
                tracing::info!(
                    "No employees yet, creating {} without permission check",
                    name
                );
                Authentication::Full
            } else {
                context()?
            };
            let employee = employee_service
                .create(
                    &Employee {
                        id: Uuid::nil(),
                        name: name.into(),
                        team,
                        role,
                        hidden,
                        created: None,
                    },
                    context,
                    None,
                )
                .await?;
            to_json(&employee)
        }
        Command::UpdateEmployee {
            id,
            name,
            team,
            role,
            hidden,
        } => {
            let update = EmployeeUpdate {
                name: name.map(Arc::from),
                team,
                role,
                hidden,
            };
            let employee = state
                .employee_service()
                .update(id, &update, context()?, None)
                .await?;
            to_json(&employee)
        }
        Command::DeleteEmployee { id } => {
            state.employee_service().delete(id, context()?, None).await?;
            to_json(&id)
        }
        Command::ListEmployees => {
            to_json(&state.employee_service().get_all(context()?, None).await?)
        }

        Command::Settings => {
            to_json(&state.settings_service().get_settings(context()?, None).await?)
        }
        Command::SetStartDate { date } => {
            let settings_service = state.settings_service();
            let current = settings_service.get_settings(context()?, None).await?;
            let restarted = Settings::with_start_date(date);
            let settings = Settings {
                teams: restarted
                    .teams
                    .iter()
                    .map(|setting| TeamSetting {
                        name: current.team_name(setting.team),
                        ..setting.clone()
                    })
                    .collect(),
                ..restarted
            };
            let saved = settings_service
                .save_settings(&settings, context()?, None)
                .await?;
            to_json(&saved)
        }
        Command::SetTeam { team, anchor, name } => {
            let settings_service = state.settings_service();
            let current = settings_service.get_settings(context()?, None).await?;
            let settings = with_team(&current, team, anchor, name);
            let saved = settings_service
                .save_settings(&settings, context()?, None)
                .await?;
            to_json(&saved)
        }

        Command::Schedule {
            year,
            month,
            employee,
            show_empty,
        } => {
            let days = state
                .schedule_service()
                .get_schedule(target(employee)?, year, month, show_empty, context()?, None)
                .await?;
            to_json(&days)
        }
        Command::Day { date, employee } => {
            resolved_day(state, target(employee)?, date, context()?).await
        }

        Command::Absence {
            date,
            reason,
            hours,
            employee,
        } => {
            let user_id = target(employee)?;
            let absence = Absence {
                user_id,
                date,
                reason: reason.into(),
                hours,
            };
            state
                .day_entry_service()
                .save_absence(&absence, context()?, None)
                .await?;
            resolved_day(state, user_id, date, context()?).await
        }
        Command::Overtime {
            date,
            mertid,
            ot50,
            ot100,
            ot200,
            employee,
        } => {
            let user_id = target(employee)?;
            let overtime = Overtime {
                user_id,
                date,
                mertid,
                ot50,
                ot100,
                ot200,
            };
            state
                .day_entry_service()
                .save_overtime(&overtime, context()?, None)
                .await?;
            resolved_day(state, user_id, date, context()?).await
        }
        Command::ManualHours {
            date,
            hours,
            employee,
        } => {
            let user_id = target(employee)?;
            state
                .day_entry_service()
                .save_manual_hours(
                    &ManualHours {
                        user_id,
                        date,
                        hours,
                    },
                    context()?,
                    None,
                )
                .await?;
            resolved_day(state, user_id, date, context()?).await
        }
        Command::Note {
            date,
            text,
            employee,
        } => {
            let user_id = target(employee)?;
            state
                .day_entry_service()
                .save_note(
                    &DayNote {
                        user_id,
                        date,
                        note: text.into(),
                    },
                    context()?,
                    None,
                )
                .await?;
            resolved_day(state, user_id, date, context()?).await
        }
        Command::ShiftOverride {
            date,
            shift,
            employee,
        } => {
            let user_id = target(employee)?;
            state
                .day_entry_service()
                .save_shift_override(
                    &ShiftOverride {
                        user_id,
                        date,
                        shift_type: shift,
                    },
                    context()?,
                    None,
                )
                .await?;
            resolved_day(state, user_id, date, context()?).await
        }

        Command::SaveReport {
            year,
            month,
            employee,
        } => {
            let report = state
                .report_service()
                .save_report(target(employee)?, year, month, context()?, None)
                .await?;
            to_json(&report)
        }
        Command::Report {
            year,
            month,
            employee,
        } => {
            let report = state
                .report_service()
                .get_report(target(employee)?, year, month, context()?, None)
                .await?;
            to_json(&report)
        }
        Command::ListReports { year, month } => {
            let summaries = state
                .report_service()
                .list_reports(year, month, context()?, None)
                .await?;
            to_json(&summaries)
        }
        Command::ApproveReport { id } => {
            let report = state
                .report_service()
                .approve_report(id, acting(acting_user)?, context()?, None)
                .await?;
            to_json(&report)
        }

        Command::LeaveSpan { from, to, employee } => {
            let span = state
                .leave_request_service()
                .calculate_span(target(employee)?, from, to, context()?, None)
                .await?;
            to_json(&span)
        }
        Command::SubmitLeave {
            leave_type,
            from,
            to,
            comment,
            employee,
        } => {
            let request = state
                .leave_request_service()
                .submit(
                    target(employee)?,
                    leave_type,
                    from,
                    to,
                    comment.map(Arc::from),
                    context()?,
                    None,
                )
                .await?;
            to_json(&request)
        }
        Command::ApproveLeave { id } => {
            let request = state
                .leave_request_service()
                .approve(id, acting(acting_user)?, context()?, None)
                .await?;
            to_json(&request)
        }
        Command::DenyLeave { id, reason } => {
            let request = state
                .leave_request_service()
                .deny(id, acting(acting_user)?, &reason, context()?, None)
                .await?;
            to_json(&request)
        }
        Command::CancelLeave { id } => {
            to_json(&state.leave_request_service().cancel(id, context()?, None).await?)
        }
        Command::ListLeave { employee } => {
            let requests = state
                .leave_request_service()
                .list_for_user(target(employee)?, context()?, None)
                .await?;
            to_json(&requests)
        }
        Command::ListAllLeave => {
            to_json(&state.leave_request_service().list_all(context()?, None).await?)
        }

        Command::Statistics { year, employee } => {
            let statistics = state
                .statistics_service()
                .get_statistics(target(employee)?, year, context()?, None)
                .await?;
            to_json(&statistics)
        }
        Command::CompanyStatistics { year, month } => {
            let statistics = state
                .statistics_service()
                .get_company_statistics(year, month, context()?, None)
                .await?;
            to_json(&statistics)
        }

        Command::Phrases => to_json(&state.phrase_service().get_all(context()?, None).await?),
        Command::AddPhrase { phrase } => {
            let phrase = state
                .phrase_service()
                .create(&phrase, context()?, None)
                .await?;
            to_json(&phrase)
        }
        Command::DeletePhrase { id } => {
            state.phrase_service().delete(id, context()?, None).await?;
            to_json(&id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_with_team_keeps_other_teams() {
        let settings = Settings::with_start_date(date!(2024 - 01 - 01));
        let changed = with_team(&settings, Team::B, None, Some("Nattlaget".into()));
        assert_eq!(changed.team_name(Team::B).as_ref(), "Nattlaget");
        assert_eq!(changed.anchor(Team::B), date!(2024 - 01 - 08));
        assert_eq!(changed.anchor(Team::C), date!(2024 - 01 - 15));
        assert_eq!(changed.team_name(Team::A).as_ref(), "Skiftlag 1");
        assert_eq!(changed.teams.len(), 4);
    }

    #[test]
    fn test_with_team_moves_anchor() {
        let settings = Settings::with_start_date(date!(2024 - 01 - 01));
        let changed = with_team(&settings, Team::A, Some(date!(2024 - 02 - 05)), None);
        assert_eq!(changed.anchor(Team::A), date!(2024 - 02 - 05));
        assert_eq!(changed.start_date, date!(2024 - 01 - 01));
    }
}
