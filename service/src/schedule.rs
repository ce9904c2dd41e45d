use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::rotation::ShiftLabel;
use crate::ServiceError;

/// One resolved day of an employee's timesheet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: Date,
    /// Swedish weekday name.
    pub weekday: &'static str,
    pub label: ShiftLabel,
    pub planned: f32,
    pub worked: f32,
    pub absence_reason: Arc<str>,
    pub absence_hours: f32,
    pub leave_hours: f32,
    pub mertid: f32,
    pub ot50: f32,
    pub ot100: f32,
    pub ot200: f32,
    pub note: Arc<str>,
    pub is_weekend: bool,
    pub is_red_day: bool,
    pub has_activity: bool,
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait ScheduleService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// All days of the month in ascending order.
    ///
    /// Days without activity are left out unless `show_empty` is set.
    async fn get_schedule(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        show_empty: bool,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[DayRecord]>, ServiceError>;

    async fn resolve_day(
        &self,
        user_id: Uuid,
        date: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<DayRecord, ServiceError>;
}
