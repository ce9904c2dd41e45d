use async_trait::async_trait;
use dao::{employee::EmployeeDao, TransactionDao};
use service::employee::Role;
use service::permission::Authentication;
use service::user_service::UserService;
use service::{PermissionService, ServiceError};
use uuid::Uuid;

use crate::gen_service_impl;

gen_service_impl! {
    struct PermissionServiceImpl: PermissionService = PermissionServiceDeps {
        EmployeeDao: EmployeeDao<Transaction = Self::Transaction> = employee_dao,
        UserService: UserService<Context = Self::Context> = user_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

#[async_trait]
impl<Deps: PermissionServiceDeps> PermissionService for PermissionServiceImpl<Deps> {
    type Context = Deps::Context;
    type Transaction = Deps::Transaction;

    async fn current_user_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Uuid>, ServiceError> {
        match context {
            Authentication::Full => Ok(None),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                Ok(Some(current_user))
            }
        }
    }

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                let tx = self.transaction_dao.use_transaction(tx).await?;
                let employee = self.employee_dao.find_by_id(current_user, tx.clone()).await?;
                self.transaction_dao.commit(tx).await?;
                match employee {
                    Some(employee) if Role::from(employee.role).has_privilege(privilege) => Ok(()),
                    _ => {
                        tracing::debug!(%current_user, privilege, "Permission denied");
                        Err(ServiceError::Forbidden)
                    }
                }
            }
        }
    }

    async fn check_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError> {
        match context {
            Authentication::Full => Ok(()),
            Authentication::Context(context) => {
                let current_user = self.user_service.current_user(context).await?;
                if current_user == user_id {
                    Ok(())
                } else {
                    Err(ServiceError::Forbidden)
                }
            }
        }
    }
}
