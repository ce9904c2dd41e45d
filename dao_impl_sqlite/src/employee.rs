use std::sync::Arc;

use crate::{date_time_from_db, date_time_to_db, id_from_db, id_to_db, ResultDbErrorExt};
use async_trait::async_trait;
use dao::{
    employee::{EmployeeDao, EmployeeEntity, RoleEntity, TeamEntity},
    DaoError,
};
use sqlx::{query, query_as};
use tracing::instrument;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct EmployeeDb {
    id: Vec<u8>,
    name: String,
    team: String,
    role: String,
    hidden: bool,
    created: String,
}

pub(crate) fn team_to_db(team: TeamEntity) -> &'static str {
    match team {
        TeamEntity::A => "A",
        TeamEntity::B => "B",
        TeamEntity::C => "C",
        TeamEntity::D => "D",
    }
}

pub(crate) fn team_from_db(value: &str) -> Result<TeamEntity, DaoError> {
    match value {
        "A" => Ok(TeamEntity::A),
        "B" => Ok(TeamEntity::B),
        "C" => Ok(TeamEntity::C),
        "D" => Ok(TeamEntity::D),
        _ => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

fn role_to_db(role: RoleEntity) -> &'static str {
    match role {
        RoleEntity::Admin => "Admin",
        RoleEntity::User => "Användare",
        RoleEntity::Controller => "Kontrollant",
    }
}

fn role_from_db(value: &str) -> Result<RoleEntity, DaoError> {
    match value {
        "Admin" => Ok(RoleEntity::Admin),
        "Användare" => Ok(RoleEntity::User),
        "Kontrollant" => Ok(RoleEntity::Controller),
        _ => Err(DaoError::EnumValueNotFound(value.into())),
    }
}

impl TryFrom<&EmployeeDb> for EmployeeEntity {
    type Error = DaoError;

    fn try_from(employee: &EmployeeDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id_from_db(&employee.id)?,
            name: employee.name.as_str().into(),
            team: team_from_db(&employee.team)?,
            role: role_from_db(&employee.role)?,
            hidden: employee.hidden,
            created: date_time_from_db(&employee.created)?,
        })
    }
}

const SELECT_EMPLOYEE: &str = "SELECT id, name, team, role, hidden, created FROM employee";

pub struct EmployeeDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl EmployeeDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl EmployeeDao for EmployeeDaoImpl {
    type Transaction = crate::TransactionImpl;

    #[instrument(skip(self, tx))]
    async fn all(&self, tx: Self::Transaction) -> Result<Arc<[EmployeeEntity]>, DaoError> {
        query_as::<_, EmployeeDb>(&format!("{SELECT_EMPLOYEE} ORDER BY name"))
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(EmployeeEntity::try_from)
            .collect::<Result<Arc<[EmployeeEntity]>, DaoError>>()
    }

    #[instrument(skip(self, tx))]
    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        query_as::<_, EmployeeDb>(&format!("{SELECT_EMPLOYEE} WHERE id = ?"))
            .bind(id_to_db(id))
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(EmployeeEntity::try_from)
            .transpose()
    }

    #[instrument(skip(self, tx))]
    async fn find_by_name(
        &self,
        name: &str,
        tx: Self::Transaction,
    ) -> Result<Option<EmployeeEntity>, DaoError> {
        query_as::<_, EmployeeDb>(&format!("{SELECT_EMPLOYEE} WHERE name = ?"))
            .bind(name)
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(EmployeeEntity::try_from)
            .transpose()
    }

    async fn create(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"INSERT INTO employee (id, name, team, role, hidden, created, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id_to_db(entity.id))
        .bind(entity.name.as_ref())
        .bind(team_to_db(entity.team))
        .bind(role_to_db(entity.role))
        .bind(entity.hidden)
        .bind(date_time_to_db(entity.created)?)
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn update(
        &self,
        entity: &EmployeeEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            r"UPDATE employee SET name = ?, team = ?, role = ?, hidden = ?, update_process = ? WHERE id = ?",
        )
        .bind(entity.name.as_ref())
        .bind(team_to_db(entity.team))
        .bind(role_to_db(entity.role))
        .bind(entity.hidden)
        .bind(process)
        .bind(id_to_db(entity.id))
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn delete(
        &self,
        id: Uuid,
        _process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(r"DELETE FROM employee WHERE id = ?")
            .bind(id_to_db(id))
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;
    use crate::TransactionDaoImpl;
    use dao::TransactionDao;
    use time::macros::datetime;
    use uuid::uuid;

    fn employee() -> EmployeeEntity {
        EmployeeEntity {
            id: uuid!("0E21E3C4-6A1F-4C3B-9B1C-6A8E2F7D1A01"),
            name: "Anna".into(),
            team: TeamEntity::B,
            role: RoleEntity::Controller,
            hidden: false,
            created: datetime!(2024-01-01 08:00:00),
        }
    }

    #[tokio::test]
    async fn test_create_find_update_delete() {
        let pool = memory_pool().await;
        let transaction_dao = TransactionDaoImpl::new(pool.clone());
        let dao = EmployeeDaoImpl::new(pool.clone());
        let tx = transaction_dao.new_transaction().await.unwrap();

        dao.create(&employee(), "test", tx.clone()).await.unwrap();
        let found = dao.find_by_id(employee().id, tx.clone()).await.unwrap();
        assert_eq!(found, Some(employee()));
        let by_name = dao.find_by_name("Anna", tx.clone()).await.unwrap();
        assert_eq!(by_name, Some(employee()));

        let updated = EmployeeEntity {
            team: TeamEntity::D,
            hidden: true,
            ..employee()
        };
        dao.update(&updated, "test", tx.clone()).await.unwrap();
        assert_eq!(dao.all(tx.clone()).await.unwrap().as_ref(), &[updated]);

        dao.delete(employee().id, "test", tx.clone()).await.unwrap();
        assert!(dao.find_by_id(employee().id, tx.clone()).await.unwrap().is_none());
        transaction_dao.commit(tx).await.unwrap();
    }
}
