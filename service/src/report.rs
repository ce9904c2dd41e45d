use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::report::ReportEntity;
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::rotation::Team;
use crate::ServiceError;

/// Monthly totals in hours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub plan: f32,
    pub worked: f32,
    pub absence: f32,
    pub leave: f32,
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
}

impl ReportTotals {
    pub fn overtime(&self) -> f32 {
        self.mertid + self.ot50 + self.ot100 + self.ot200
    }

    /// Anything deviating from the plan was recorded.
    pub fn has_changes(&self) -> bool {
        self.absence > 0.0
            || self.leave > 0.0
            || self.mertid > 0.0
            || self.ot50 > 0.0
            || self.ot100 > 0.0
            || self.ot200 > 0.0
    }
}

impl std::ops::AddAssign<&ReportTotals> for ReportTotals {
    fn add_assign(&mut self, other: &ReportTotals) {
        self.plan += other.plan;
        self.worked += other.worked;
        self.absence += other.absence;
        self.leave += other.leave;
        self.mertid += other.mertid;
        self.ot50 += other.ot50;
        self.ot100 += other.ot100;
        self.ot200 += other.ot200;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub year: u32,
    pub month: u8,
    pub created: PrimitiveDateTime,
    pub totals: ReportTotals,
    pub changes: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<PrimitiveDateTime>,
}

impl Report {
    pub fn is_approved(&self) -> bool {
        self.approved_by.is_some()
    }
}

impl From<&ReportEntity> for Report {
    fn from(entity: &ReportEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            year: entity.year,
            month: entity.month,
            created: entity.created,
            totals: ReportTotals {
                plan: entity.plan,
                worked: entity.worked,
                absence: entity.absence,
                leave: entity.leave,
                mertid: entity.mertid,
                ot50: entity.ot50,
                ot100: entity.ot100,
                ot200: entity.ot200,
            },
            changes: entity.changes,
            approved_by: entity.approved_by,
            approved_at: entity.approved_at,
        }
    }
}

impl From<&Report> for ReportEntity {
    fn from(report: &Report) -> Self {
        Self {
            id: report.id,
            user_id: report.user_id,
            year: report.year,
            month: report.month,
            created: report.created,
            plan: report.totals.plan,
            worked: report.totals.worked,
            absence: report.totals.absence,
            leave: report.totals.leave,
            mertid: report.totals.mertid,
            ot50: report.totals.ot50,
            ot100: report.totals.ot100,
            ot200: report.totals.ot200,
            changes: report.changes,
            approved_by: report.approved_by,
            approved_at: report.approved_at,
        }
    }
}

/// A report joined with the employee it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReportSummary {
    pub report_id: Uuid,
    pub user_id: Uuid,
    pub name: Arc<str>,
    pub team: Team,
    pub year: u32,
    pub month: u8,
    pub totals: ReportTotals,
    pub changes: bool,
    pub approved: bool,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<PrimitiveDateTime>,
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait ReportService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Computes the month's totals and stores them.
    ///
    /// An existing report for the month is overwritten and loses its approval.
    async fn save_report(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError>;

    async fn get_report(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Option<Report>, ServiceError>;

    /// Stored reports of all employees for a year, or one month of it.
    ///
    /// Hidden employees are included.
    async fn get_reports(
        &self,
        year: u32,
        month: Option<u8>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Report]>, ServiceError>;

    /// Reports of visible employees for one month, ordered by name.
    async fn list_reports(
        &self,
        year: u32,
        month: u8,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[ReportSummary]>, ServiceError>;

    async fn approve_report(
        &self,
        report_id: Uuid,
        admin_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Report, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changes_flag() {
        let totals = ReportTotals {
            plan: 120.0,
            worked: 120.0,
            ..Default::default()
        };
        assert!(!totals.has_changes());
        assert!(ReportTotals {
            ot100: 2.0,
            ..totals
        }
        .has_changes());
        assert!(ReportTotals {
            leave: 12.0,
            ..totals
        }
        .has_changes());
    }

    #[test]
    fn test_add_totals() {
        let mut sum = ReportTotals::default();
        let month = ReportTotals {
            plan: 100.0,
            worked: 88.0,
            absence: 12.0,
            mertid: 1.0,
            ot50: 2.0,
            ..Default::default()
        };
        sum += &month;
        sum += &month;
        assert_eq!(sum.plan, 200.0);
        assert_eq!(sum.worked, 176.0);
        assert_eq!(sum.overtime(), 6.0);
    }
}
