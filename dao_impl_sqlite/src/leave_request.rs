use std::sync::Arc;

use crate::{
    date_from_db, date_time_from_db, date_time_to_db, date_to_db, id_from_db, id_to_db,
    ResultDbErrorExt,
};
use async_trait::async_trait;
use dao::{
    leave_request::{LeaveRequestDao, LeaveRequestEntity, LeaveStatusEntity, LeaveTypeEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct LeaveRequestDb {
    id: Vec<u8>,
    user_id: Vec<u8>,
    leave_type: String,
    date_from: String,
    date_to: String,
    days: i64,
    hours: f64,
    status: String,
    comment: Option<String>,
    deny_reason: Option<String>,
    created: String,
    decided_by: Option<Vec<u8>>,
    decided_at: Option<String>,
}

fn leave_type_to_db(leave_type: LeaveTypeEntity) -> &'static str {
    match leave_type {
        LeaveTypeEntity::Vacation => "Semester",
        LeaveTypeEntity::Atk => "ATK",
        LeaveTypeEntity::Comp => "Komp",
        LeaveTypeEntity::ChildCare => "VAB",
        LeaveTypeEntity::UnpaidLeave => "Tjänstledig",
    }
}

fn leave_type_from_db(value: &str) -> Result<LeaveTypeEntity, DaoError> {
    match value {
        "Semester" => Ok(LeaveTypeEntity::Vacation),
        "ATK" => Ok(LeaveTypeEntity::Atk),
        "Komp" => Ok(LeaveTypeEntity::Comp),
        "VAB" => Ok(LeaveTypeEntity::ChildCare),
        "Tjänstledig" => Ok(LeaveTypeEntity::UnpaidLeave),
        _ => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

fn status_to_db(status: LeaveStatusEntity) -> &'static str {
    match status {
        LeaveStatusEntity::Pending => "pending",
        LeaveStatusEntity::Approved => "approved",
        LeaveStatusEntity::Denied => "denied",
        LeaveStatusEntity::Cancelled => "cancelled",
    }
}

fn status_from_db(value: &str) -> Result<LeaveStatusEntity, DaoError> {
    match value {
        "pending" => Ok(LeaveStatusEntity::Pending),
        "approved" => Ok(LeaveStatusEntity::Approved),
        "denied" => Ok(LeaveStatusEntity::Denied),
        "cancelled" => Ok(LeaveStatusEntity::Cancelled),
        _ => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

impl TryFrom<&LeaveRequestDb> for LeaveRequestEntity {
    type Error = DaoError;

    fn try_from(request: &LeaveRequestDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id_from_db(&request.id)?,
            user_id: id_from_db(&request.user_id)?,
            leave_type: leave_type_from_db(&request.leave_type)?,
            date_from: date_from_db(&request.date_from)?,
            date_to: date_from_db(&request.date_to)?,
            days: request.days as u32,
            hours: request.hours as f32,
            status: status_from_db(&request.status)?,
            comment: request.comment.as_deref().map(Arc::from),
            deny_reason: request.deny_reason.as_deref().map(Arc::from),
            created: date_time_from_db(&request.created)?,
            decided_by: request.decided_by.as_deref().map(id_from_db).transpose()?,
            decided_at: request
                .decided_at
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
        })
    }
}

const SELECT_LEAVE_REQUEST: &str = "SELECT id, user_id, leave_type, date_from, date_to, days, hours, status, comment, deny_reason, created, decided_by, decided_at FROM leave_request";

pub struct LeaveRequestDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl LeaveRequestDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl LeaveRequestDao for LeaveRequestDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<LeaveRequestEntity>, DaoError> {
        query_as::<_, LeaveRequestDb>(&format!("{SELECT_LEAVE_REQUEST} WHERE id = ?"))
            .bind(id_to_db(id))
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(LeaveRequestEntity::try_from)
            .transpose()
    }

    async fn find_active_by_user(
        &self,
        user_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError> {
        query_as::<_, LeaveRequestDb>(&format!(
            "{SELECT_LEAVE_REQUEST} WHERE user_id = ? AND status != 'cancelled' ORDER BY created DESC"
        ))
        .bind(id_to_db(user_id))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(LeaveRequestEntity::try_from)
        .collect::<Result<Arc<[LeaveRequestEntity]>, DaoError>>()
    }

    async fn find_all_active(
        &self,
        tx: Self::Transaction,
    ) -> Result<Arc<[LeaveRequestEntity]>, DaoError> {
        query_as::<_, LeaveRequestDb>(&format!(
            "{SELECT_LEAVE_REQUEST} WHERE status != 'cancelled' ORDER BY created DESC"
        ))
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(LeaveRequestEntity::try_from)
        .collect::<Result<Arc<[LeaveRequestEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO leave_request (id, user_id, leave_type, date_from, date_to, days, hours, status, comment, deny_reason, created, decided_by, decided_at, update_process)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_to_db(entity.id))
        .bind(id_to_db(entity.user_id))
        .bind(leave_type_to_db(entity.leave_type))
        .bind(date_to_db(entity.date_from)?)
        .bind(date_to_db(entity.date_to)?)
        .bind(entity.days as i64)
        .bind(entity.hours as f64)
        .bind(status_to_db(entity.status))
        .bind(entity.comment.as_deref())
        .bind(entity.deny_reason.as_deref())
        .bind(date_time_to_db(entity.created)?)
        .bind(entity.decided_by.map(id_to_db))
        .bind(entity.decided_at.map(date_time_to_db).transpose()?)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &LeaveRequestEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"UPDATE leave_request SET status = ?, deny_reason = ?, decided_by = ?, decided_at = ?, update_process = ? WHERE id = ?",
        )
        .bind(status_to_db(entity.status))
        .bind(entity.deny_reason.as_deref())
        .bind(entity.decided_by.map(id_to_db))
        .bind(entity.decided_at.map(date_time_to_db).transpose()?)
        .bind(process)
        .bind(id_to_db(entity.id))
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
