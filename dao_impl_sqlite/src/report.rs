use std::sync::Arc;

use crate::{date_time_from_db, date_time_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    report::{ReportDao, ReportEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct ReportDb {
    id: Vec<u8>,
    user_id: Vec<u8>,
    year: i64,
    month: i64,
    created: String,
    plan: f64,
    worked: f64,
    absence: f64,
    leave: f64,
    mertid: f64,
    ot50: f64,
    ot100: f64,
    ot200: f64,
    changes: bool,
    approved_by: Option<Vec<u8>>,
    approved_at: Option<String>,
}

impl TryFrom<&ReportDb> for ReportEntity {
    type Error = DaoError;

    fn try_from(report: &ReportDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id_from_db(&report.id)?,
            user_id: id_from_db(&report.user_id)?,
            year: report.year as u32,
            month: report.month as u8,
            created: date_time_from_db(&report.created)?,
            plan: report.plan as f32,
            worked: report.worked as f32,
            absence: report.absence as f32,
            leave: report.leave as f32,
            mertid: report.mertid as f32,
            ot50: report.ot50 as f32,
            ot100: report.ot100 as f32,
            ot200: report.ot200 as f32,
            changes: report.changes,
            approved_by: report.approved_by.as_deref().map(id_from_db).transpose()?,
            approved_at: report
                .approved_at
                .as_deref()
                .map(date_time_from_db)
                .transpose()?,
        })
    }
}

const SELECT_REPORT: &str = "SELECT id, user_id, year, month, created, plan, worked, absence, leave, mertid, ot50, ot100, ot200, changes, approved_by, approved_at FROM report";

pub struct ReportDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ReportDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ReportDao for ReportDaoImpl {
    type Transaction = crate::TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError> {
        query_as::<_, ReportDb>(&format!("{SELECT_REPORT} WHERE id = ?"))
            .bind(id_to_db(id))
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(ReportEntity::try_from)
            .transpose()
    }

    async fn find_by_user_and_month(
        &self,
        user_id: Uuid,
        year: u32,
        month: u8,
        tx: Self::Transaction,
    ) -> Result<Option<ReportEntity>, DaoError> {
        query_as::<_, ReportDb>(&format!(
            "{SELECT_REPORT} WHERE user_id = ? AND year = ? AND month = ?"
        ))
        .bind(id_to_db(user_id))
        .bind(year as i64)
        .bind(month as i64)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ReportEntity::try_from)
        .transpose()
    }

    async fn find_by_month(
        &self,
        year: u32,
        month: u8,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError> {
        query_as::<_, ReportDb>(&format!("{SELECT_REPORT} WHERE year = ? AND month = ?"))
            .bind(year as i64)
            .bind(month as i64)
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(ReportEntity::try_from)
            .collect::<Result<Arc<[ReportEntity]>, DaoError>>()
    }

    async fn find_by_year(
        &self,
        year: u32,
        tx: Self::Transaction,
    ) -> Result<Arc<[ReportEntity]>, DaoError> {
        query_as::<_, ReportDb>(&format!("{SELECT_REPORT} WHERE year = ? ORDER BY month"))
            .bind(year as i64)
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(ReportEntity::try_from)
            .collect::<Result<Arc<[ReportEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO report (id, user_id, year, month, created, plan, worked, absence, leave, mertid, ot50, ot100, ot200, changes, approved_by, approved_at, update_process)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_to_db(entity.id))
        .bind(id_to_db(entity.user_id))
        .bind(entity.year as i64)
        .bind(entity.month as i64)
        .bind(date_time_to_db(entity.created)?)
        .bind(entity.plan as f64)
        .bind(entity.worked as f64)
        .bind(entity.absence as f64)
        .bind(entity.leave as f64)
        .bind(entity.mertid as f64)
        .bind(entity.ot50 as f64)
        .bind(entity.ot100 as f64)
        .bind(entity.ot200 as f64)
        .bind(entity.changes)
        .bind(entity.approved_by.map(id_to_db))
        .bind(entity.approved_at.map(date_time_to_db).transpose()?)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &ReportEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"UPDATE report SET created = ?, plan = ?, worked = ?, absence = ?, leave = ?, mertid = ?, ot50 = ?, ot100 = ?, ot200 = ?,
              changes = ?, approved_by = ?, approved_at = ?, update_process = ? WHERE id = ?",
        )
        .bind(date_time_to_db(entity.created)?)
        .bind(entity.plan as f64)
        .bind(entity.worked as f64)
        .bind(entity.absence as f64)
        .bind(entity.leave as f64)
        .bind(entity.mertid as f64)
        .bind(entity.ot50 as f64)
        .bind(entity.ot100 as f64)
        .bind(entity.ot200 as f64)
        .bind(entity.changes)
        .bind(entity.approved_by.map(id_to_db))
        .bind(entity.approved_at.map(date_time_to_db).transpose()?)
        .bind(process)
        .bind(id_to_db(entity.id))
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }
}
