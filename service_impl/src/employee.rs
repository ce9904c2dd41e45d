use std::sync::Arc;

use async_trait::async_trait;
use dao::{
    employee::{EmployeeDao, EmployeeEntity},
    TransactionDao,
};
use service::{
    clock::ClockService,
    employee::{Employee, EmployeeService, EmployeeUpdate},
    permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE},
    uuid_service::UuidService,
    PermissionService, ServiceError,
};
use tokio::join;
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct EmployeeServiceImpl: EmployeeService = EmployeeServiceDeps {
        EmployeeDao: EmployeeDao<Transaction = Self::Transaction> = employee_dao,
        PermissionService: PermissionService<Context = Self::Context, Transaction = Self::Transaction> = permission_service,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

const EMPLOYEE_SERVICE_PROCESS: &str = "employee-service";

impl<Deps: EmployeeServiceDeps> EmployeeServiceImpl<Deps> {
    /// Fails if another employee already carries the trimmed name.
    async fn check_name_available(
        &self,
        name: &str,
        own_id: Option<Uuid>,
        tx: Deps::Transaction,
    ) -> Result<(), ServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::missing_value("name"));
        }
        match self.employee_dao.find_by_name(name, tx).await? {
            Some(existing) if Some(existing.id) != own_id => {
                Err(ServiceError::NameAlreadyExists(name.into()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<Deps: EmployeeServiceDeps> EmployeeService for EmployeeServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn get_all(
        &self,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[Employee]>, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(CONTROLLER_PRIVILEGE, context, tx.clone().into())
            .await?;
        let employees = self
            .employee_dao
            .all(tx.clone())
            .await?
            .iter()
            .map(Employee::from)
            .collect();
        self.transaction_dao.commit(tx).await?;
        Ok(employees)
    }

    async fn get(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let (controller, own) = join!(
            self.permission_service.check_permission(
                CONTROLLER_PRIVILEGE,
                context.clone(),
                tx.clone().into()
            ),
            self.permission_service.check_user(id, context.clone()),
        );
        controller.or(own)?;
        let employee = self
            .employee_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Employee::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn create(
        &self,
        employee: &Employee,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;

        if employee.id != Uuid::nil() {
            return Err(ServiceError::IdSetOnCreate);
        }
        if employee.created.is_some() {
            return Err(ServiceError::CreatedSetOnCreate);
        }
        self.check_name_available(&employee.name, None, tx.clone())
            .await?;

        let employee = Employee {
            id: self.uuid_service.new_uuid("employee-id"),
            name: employee.name.trim().into(),
            created: Some(self.clock_service.date_time_now()),
            ..employee.clone()
        };
        self.employee_dao
            .create(
                &EmployeeEntity::try_from(&employee)?,
                EMPLOYEE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(employee)
    }

    async fn update(
        &self,
        id: Uuid,
        update: &EmployeeUpdate,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Employee, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;

        let employee = self
            .employee_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Employee::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        if update.is_empty() {
            self.transaction_dao.commit(tx).await?;
            return Ok(employee);
        }

        let updated = update.apply(&employee);
        if let Some(name) = &update.name {
            self.check_name_available(name, Some(id), tx.clone())
                .await?;
        }
        let updated = Employee {
            name: updated.name.trim().into(),
            ..updated
        };
        self.employee_dao
            .update(
                &EmployeeEntity::try_from(&updated)?,
                EMPLOYEE_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(updated)
    }

    async fn delete(
        &self,
        id: Uuid,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        self.permission_service
            .check_permission(ADMIN_PRIVILEGE, context, tx.clone().into())
            .await?;
        if self.employee_dao.find_by_id(id, tx.clone()).await?.is_none() {
            return Err(ServiceError::EntityNotFound(id));
        }
        self.employee_dao
            .delete(id, EMPLOYEE_SERVICE_PROCESS, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(())
    }

    async fn verify_user_is_employee(
        &self,
        id: Uuid,
        _context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let exists = self.employee_dao.find_by_id(id, tx.clone()).await?.is_some();
        self.transaction_dao.commit(tx).await?;
        if exists {
            Ok(())
        } else {
            Err(ServiceError::EntityNotFound(id))
        }
    }
}
