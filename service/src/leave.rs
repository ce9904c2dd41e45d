//! Leave requests and their approval workflow.
//!
//! A request starts as `Pending` and moves once to `Approved`, `Denied` or
//! `Cancelled`. Approving a request books an absence for every working day
//! it covers.

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dao::leave_request::{LeaveRequestEntity, LeaveStatusEntity, LeaveTypeEntity};
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use skiftplan_utils::derive_from_reference;
use time::{Date, PrimitiveDateTime};
use uuid::Uuid;

use crate::permission::Authentication;
use crate::rotation::Team;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LeaveType {
    #[serde(rename = "Semester")]
    Vacation,
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "Komp")]
    Comp,
    #[serde(rename = "VAB")]
    ChildCare,
    #[serde(rename = "Tjänstledig")]
    UnpaidLeave,
}

impl LeaveType {
    /// Name used as absence reason once the request is approved.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Semester",
            LeaveType::Atk => "ATK",
            LeaveType::Comp => "Komp",
            LeaveType::ChildCare => "VAB",
            LeaveType::UnpaidLeave => "Tjänstledig",
        }
    }
}

impl Display for LeaveType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveType {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Semester" => Ok(LeaveType::Vacation),
            "ATK" => Ok(LeaveType::Atk),
            "Komp" => Ok(LeaveType::Comp),
            "VAB" => Ok(LeaveType::ChildCare),
            "Tjänstledig" => Ok(LeaveType::UnpaidLeave),
            _ => Err(ServiceError::invalid_value("leave_type")),
        }
    }
}

impl From<&LeaveTypeEntity> for LeaveType {
    fn from(leave_type: &LeaveTypeEntity) -> Self {
        match leave_type {
            LeaveTypeEntity::Vacation => Self::Vacation,
            LeaveTypeEntity::Atk => Self::Atk,
            LeaveTypeEntity::Comp => Self::Comp,
            LeaveTypeEntity::ChildCare => Self::ChildCare,
            LeaveTypeEntity::UnpaidLeave => Self::UnpaidLeave,
        }
    }
}
derive_from_reference!(LeaveTypeEntity, LeaveType);

impl From<&LeaveType> for LeaveTypeEntity {
    fn from(leave_type: &LeaveType) -> Self {
        match leave_type {
            LeaveType::Vacation => Self::Vacation,
            LeaveType::Atk => Self::Atk,
            LeaveType::Comp => Self::Comp,
            LeaveType::ChildCare => Self::ChildCare,
            LeaveType::UnpaidLeave => Self::UnpaidLeave,
        }
    }
}
derive_from_reference!(LeaveType, LeaveTypeEntity);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl LeaveStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, LeaveStatus::Pending)
    }
}

impl From<&LeaveStatusEntity> for LeaveStatus {
    fn from(status: &LeaveStatusEntity) -> Self {
        match status {
            LeaveStatusEntity::Pending => Self::Pending,
            LeaveStatusEntity::Approved => Self::Approved,
            LeaveStatusEntity::Denied => Self::Denied,
            LeaveStatusEntity::Cancelled => Self::Cancelled,
        }
    }
}
derive_from_reference!(LeaveStatusEntity, LeaveStatus);

impl From<&LeaveStatus> for LeaveStatusEntity {
    fn from(status: &LeaveStatus) -> Self {
        match status {
            LeaveStatus::Pending => Self::Pending,
            LeaveStatus::Approved => Self::Approved,
            LeaveStatus::Denied => Self::Denied,
            LeaveStatus::Cancelled => Self::Cancelled,
        }
    }
}
derive_from_reference!(LeaveStatus, LeaveStatusEntity);

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub leave_type: LeaveType,
    pub date_from: Date,
    pub date_to: Date,
    pub days: u32,
    pub hours: f32,
    pub status: LeaveStatus,
    pub comment: Option<Arc<str>>,
    pub deny_reason: Option<Arc<str>>,
    pub created: PrimitiveDateTime,
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<PrimitiveDateTime>,
}

impl From<&LeaveRequestEntity> for LeaveRequest {
    fn from(entity: &LeaveRequestEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            leave_type: entity.leave_type.into(),
            date_from: entity.date_from,
            date_to: entity.date_to,
            days: entity.days,
            hours: entity.hours,
            status: entity.status.into(),
            comment: entity.comment.clone(),
            deny_reason: entity.deny_reason.clone(),
            created: entity.created,
            decided_by: entity.decided_by,
            decided_at: entity.decided_at,
        }
    }
}

impl From<&LeaveRequest> for LeaveRequestEntity {
    fn from(request: &LeaveRequest) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            leave_type: request.leave_type.into(),
            date_from: request.date_from,
            date_to: request.date_to,
            days: request.days,
            hours: request.hours,
            status: request.status.into(),
            comment: request.comment.clone(),
            deny_reason: request.deny_reason.clone(),
            created: request.created,
            decided_by: request.decided_by,
            decided_at: request.decided_at,
        }
    }
}

/// Working days and planned hours covered by a date range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LeaveSpan {
    pub days: u32,
    pub hours: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaveRequestOverview {
    pub request: LeaveRequest,
    pub name: Arc<str>,
    pub team: Team,
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait LeaveRequestService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// Counts the days in `from..=to` on which the pattern plans hours.
    ///
    /// Day overrides are ignored.
    async fn calculate_span(
        &self,
        user_id: Uuid,
        from: Date,
        to: Date,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveSpan, ServiceError>;

    async fn submit(
        &self,
        user_id: Uuid,
        leave_type: LeaveType,
        from: Date,
        to: Date,
        comment: Option<Arc<str>>,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn approve(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn deny(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
        reason: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    /// Withdraws a pending request. Decided requests are returned unchanged.
    async fn cancel(
        &self,
        request_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<LeaveRequest, ServiceError>;

    async fn list_for_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequest]>, ServiceError>;

    async fn list_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[LeaveRequestOverview]>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leave_type_names() {
        for leave_type in [
            LeaveType::Vacation,
            LeaveType::Atk,
            LeaveType::Comp,
            LeaveType::ChildCare,
            LeaveType::UnpaidLeave,
        ] {
            assert_eq!(leave_type.as_str().parse::<LeaveType>().ok(), Some(leave_type));
        }
        assert!(matches!(
            "Sjuk".parse::<LeaveType>(),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
