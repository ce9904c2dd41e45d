use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use dao::employee::{EmployeeEntity, RoleEntity};
use dao::MockTransaction;
use mockall::automock;
use serde::Serialize;
use skiftplan_utils::derive_from_reference;
use uuid::Uuid;

use crate::permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE};
use crate::rotation::Team;
use crate::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Role {
    Admin,
    #[serde(rename = "Användare")]
    User,
    #[serde(rename = "Kontrollant")]
    Controller,
}

impl Role {
    pub fn privileges(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE],
            Role::Controller => &[CONTROLLER_PRIVILEGE],
            Role::User => &[],
        }
    }

    pub fn has_privilege(&self, privilege: &str) -> bool {
        self.privileges().contains(&privilege)
    }
}

impl FromStr for Role {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Admin" | "admin" => Ok(Role::Admin),
            "Användare" | "user" => Ok(Role::User),
            "Kontrollant" | "controller" => Ok(Role::Controller),
            _ => Err(ServiceError::invalid_value("role")),
        }
    }
}

impl From<&RoleEntity> for Role {
    fn from(role: &RoleEntity) -> Self {
        match role {
            RoleEntity::Admin => Self::Admin,
            RoleEntity::User => Self::User,
            RoleEntity::Controller => Self::Controller,
        }
    }
}
derive_from_reference!(RoleEntity, Role);

impl From<&Role> for RoleEntity {
    fn from(role: &Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::User => Self::User,
            Role::Controller => Self::Controller,
        }
    }
}
derive_from_reference!(Role, RoleEntity);

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: Uuid,
    pub name: Arc<str>,
    pub team: Team,
    pub role: Role,
    pub hidden: bool,
    pub created: Option<time::PrimitiveDateTime>,
}

impl From<&EmployeeEntity> for Employee {
    fn from(entity: &EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name.clone(),
            team: entity.team.into(),
            role: entity.role.into(),
            hidden: entity.hidden,
            created: Some(entity.created),
        }
    }
}

impl TryFrom<&Employee> for EmployeeEntity {
    type Error = ServiceError;

    fn try_from(employee: &Employee) -> Result<Self, Self::Error> {
        Ok(Self {
            id: employee.id,
            name: employee.name.clone(),
            team: employee.team.into(),
            role: employee.role.into(),
            hidden: employee.hidden,
            created: employee.created.ok_or(ServiceError::InternalError)?,
        })
    }
}

/// Partial update of an employee. Only the fields which are set change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
    pub name: Option<Arc<str>>,
    pub team: Option<Team>,
    pub role: Option<Role>,
    pub hidden: Option<bool>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply(&self, employee: &Employee) -> Employee {
        Employee {
            name: self.name.clone().unwrap_or_else(|| employee.name.clone()),
            team: self.team.unwrap_or(employee.team),
            role: self.role.unwrap_or(employee.role),
            hidden: self.hidden.unwrap_or(employee.hidden),
            ..employee.clone()
        }
    }
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait EmployeeService {
    type Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError>;
    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn create(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn update(
        &self,
        id: Uuid,
        update: &EmployeeUpdate,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError>;
    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
    async fn verify_user_is_employee(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_privileges() {
        assert!(Role::Admin.has_privilege(ADMIN_PRIVILEGE));
        assert!(Role::Admin.has_privilege(CONTROLLER_PRIVILEGE));
        assert!(!Role::Controller.has_privilege(ADMIN_PRIVILEGE));
        assert!(Role::Controller.has_privilege(CONTROLLER_PRIVILEGE));
        assert!(!Role::User.has_privilege(CONTROLLER_PRIVILEGE));
    }

    #[test]
    fn test_update_only_changes_given_fields() {
        let employee = Employee {
            id: Uuid::nil(),
            name: "Cecilia".into(),
            team: Team::C,
            role: Role::User,
            hidden: false,
            created: None,
        };
        let update = EmployeeUpdate {
            team: Some(Team::D),
            ..Default::default()
        };
        let updated = update.apply(&employee);
        assert_eq!(updated.team, Team::D);
        assert_eq!(updated.name, employee.name);
        assert_eq!(updated.role, Role::User);
        assert!(EmployeeUpdate::default().is_empty());
        assert!(!update.is_empty());
    }
}
