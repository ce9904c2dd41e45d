use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::rotation::Team;
use crate::ServiceError;

/// Number of entries in each top list of the company statistics.
pub const TOP_LIST_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OvertimeTotals {
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
}

impl OvertimeTotals {
    pub fn total(&self) -> f32 {
        self.mertid + self.ot50 + self.ot100 + self.ot200
    }
}

impl std::ops::AddAssign<&OvertimeTotals> for OvertimeTotals {
    fn add_assign(&mut self, other: &OvertimeTotals) {
        self.mertid += other.mertid;
        self.ot50 += other.ot50;
        self.ot100 += other.ot100;
        self.ot200 += other.ot200;
    }
}

/// Recorded absences and overtime of one employee during a year.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct UserStatistics {
    pub year: u32,
    pub total_absence: f32,
    pub total_overtime: f32,
    pub sick_hours: f32,
    pub leave_hours: f32,
    /// Absence hours per month and reason.
    pub absence_by_month: BTreeMap<u8, BTreeMap<Arc<str>, f32>>,
    pub overtime_by_month: BTreeMap<u8, OvertimeTotals>,
}

/// Report totals of one employee summed over the requested period.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmployeeStatistics {
    pub user_id: Uuid,
    pub name: Arc<str>,
    pub team: Team,
    pub worked: f32,
    pub absence: f32,
    pub leave: f32,
    pub overtime: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStatistics {
    pub team: Team,
    pub user_count: u32,
    pub worked: f32,
    pub absence: f32,
    pub leave: f32,
    pub overtime: f32,
}

impl TeamStatistics {
    pub fn empty(team: Team) -> Self {
        Self {
            team,
            user_count: 0,
            worked: 0.0,
            absence: 0.0,
            leave: 0.0,
            overtime: 0.0,
        }
    }

    pub fn add(&mut self, employee: &EmployeeStatistics) {
        self.user_count += 1;
        self.worked += employee.worked;
        self.absence += employee.absence;
        self.leave += employee.leave;
        self.overtime += employee.overtime;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopEntry {
    pub name: Arc<str>,
    pub hours: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CompanyStatistics {
    pub year: u32,
    pub month: Option<u8>,
    pub total_worked: f32,
    pub total_absence: f32,
    pub total_leave: f32,
    pub total_overtime: f32,
    pub sick_hours: f32,
    pub sick_percent: f32,
    pub user_count: u32,
    pub by_team: Arc<[TeamStatistics]>,
    pub top_worked: Arc<[TopEntry]>,
    pub top_absence: Arc<[TopEntry]>,
    pub top_overtime: Arc<[TopEntry]>,
    pub users: Arc<[EmployeeStatistics]>,
}

/// Share of worked hours lost to sickness, in percent.
pub fn sick_percent(sick_hours: f32, worked_hours: f32) -> f32 {
    if worked_hours > 0.0 {
        sick_hours / worked_hours * 100.0
    } else {
        0.0
    }
}

/// The employees with the most hours, highest first.
///
/// Employees with equal hours keep their input order.
pub fn top_entries(
    employees: &[EmployeeStatistics],
    hours: impl Fn(&EmployeeStatistics) -> f32,
) -> Arc<[TopEntry]> {
    let mut entries: Vec<TopEntry> = employees
        .iter()
        .map(|employee| TopEntry {
            name: employee.name.clone(),
            hours: hours(employee),
        })
        .collect();
    entries.sort_by(|a, b| b.hours.total_cmp(&a.hours));
    entries.truncate(TOP_LIST_SIZE);
    entries.into()
}

/// Per team sums in team order. Teams without employees are left out.
pub fn team_statistics(employees: &[EmployeeStatistics]) -> Arc<[TeamStatistics]> {
    Team::ALL
        .iter()
        .filter_map(|team| {
            let mut statistics = TeamStatistics::empty(*team);
            employees
                .iter()
                .filter(|employee| employee.team == *team)
                .for_each(|employee| statistics.add(employee));
            (statistics.user_count > 0).then_some(statistics)
        })
        .collect()
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait StatisticsService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Absence and overtime of one employee, computed from the day records.
    async fn get_statistics(
        &self,
        user_id: Uuid,
        year: u32,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<UserStatistics, ServiceError>;

    /// Totals over all visible employees, computed from the stored reports.
    ///
    /// `month` restricts the statistics to one month of the year.
    async fn get_company_statistics(
        &self,
        year: u32,
        month: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<CompanyStatistics, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str, team: Team, worked: f32, overtime: f32) -> EmployeeStatistics {
        EmployeeStatistics {
            user_id: Uuid::nil(),
            name: name.into(),
            team,
            worked,
            absence: 0.0,
            leave: 0.0,
            overtime,
        }
    }

    #[test]
    fn test_sick_percent() {
        assert_eq!(sick_percent(12.0, 0.0), 0.0);
        assert_eq!(sick_percent(0.0, 0.0), 0.0);
        assert_eq!(sick_percent(12.0, 120.0), 10.0);
    }

    #[test]
    fn test_top_entries_are_stable_and_limited() {
        let employees = [
            employee("Anna", Team::A, 10.0, 0.0),
            employee("Bertil", Team::A, 30.0, 0.0),
            employee("Cecilia", Team::B, 10.0, 0.0),
            employee("David", Team::B, 20.0, 0.0),
            employee("Erik", Team::C, 5.0, 0.0),
            employee("Frida", Team::D, 40.0, 0.0),
        ];
        let top = top_entries(&employees, |employee| employee.worked);
        let names: Vec<&str> = top.iter().map(|entry| entry.name.as_ref()).collect();
        assert_eq!(names, vec!["Frida", "Bertil", "David", "Anna", "Cecilia"]);
    }

    #[test]
    fn test_team_statistics_skip_empty_teams() {
        let employees = [
            employee("Anna", Team::C, 10.0, 1.0),
            employee("Bertil", Team::A, 30.0, 2.0),
            employee("Cecilia", Team::C, 10.0, 3.0),
        ];
        let teams = team_statistics(&employees);
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].team, Team::A);
        assert_eq!(teams[1].team, Team::C);
        assert_eq!(teams[1].user_count, 2);
        assert_eq!(teams[1].worked, 20.0);
        assert_eq!(teams[1].overtime, 4.0);
    }
}
