use crate::permission::{PermissionServiceDeps, PermissionServiceImpl};
use crate::test::error_test::*;
use crate::UserServiceImpl;
use dao::employee::{EmployeeEntity, MockEmployeeDao, RoleEntity, TeamEntity};
use dao::{MockTransaction, MockTransactionDao};
use mockall::predicate::{always, eq};
use service::permission::{Authentication, ADMIN_PRIVILEGE, CONTROLLER_PRIVILEGE};
use service::user_service::{MockUserService, UserService};
use service::PermissionService;

pub struct PermissionServiceDependencies {
    pub employee_dao: MockEmployeeDao,
    pub user_service: MockUserService,
}
impl PermissionServiceDeps for PermissionServiceDependencies {
    type Context = ();
    type Transaction = MockTransaction;
    type EmployeeDao = MockEmployeeDao;
    type UserService = MockUserService;
    type TransactionDao = MockTransactionDao;
}
impl PermissionServiceDependencies {
    pub fn build_service(self) -> PermissionServiceImpl<PermissionServiceDependencies> {
        PermissionServiceImpl {
            employee_dao: self.employee_dao.into(),
            user_service: self.user_service.into(),
            transaction_dao: build_transaction_dao().into(),
        }
    }
}

fn build_dependencies(role: Option<RoleEntity>) -> PermissionServiceDependencies {
    let mut employee_dao = MockEmployeeDao::new();
    employee_dao
        .expect_find_by_id()
        .with(eq(current_user_id()), always())
        .returning(move |id, _| {
            Ok(role.map(|role| EmployeeEntity {
                id,
                name: "Anna".into(),
                team: TeamEntity::A,
                role,
                hidden: false,
                created: generate_default_datetime(),
            }))
        });
    let mut user_service = MockUserService::new();
    user_service
        .expect_current_user()
        .returning(|_| Ok(current_user_id()));
    PermissionServiceDependencies {
        employee_dao,
        user_service,
    }
}

#[tokio::test]
async fn test_full_authentication_skips_lookup() {
    let dependencies = PermissionServiceDependencies {
        employee_dao: MockEmployeeDao::new(),
        user_service: MockUserService::new(),
    };
    let permission_service = dependencies.build_service();
    permission_service
        .check_permission(ADMIN_PRIVILEGE, Authentication::Full, None)
        .await
        .expect("Full authentication must pass");
    assert_eq!(
        None,
        permission_service
            .current_user_id(Authentication::Full)
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_admin_has_all_privileges() {
    let permission_service = build_dependencies(Some(RoleEntity::Admin)).build_service();
    permission_service
        .check_permission(ADMIN_PRIVILEGE, ().auth(), None)
        .await
        .expect("Admin must pass admin check");
    permission_service
        .check_permission(CONTROLLER_PRIVILEGE, ().auth(), None)
        .await
        .expect("Admin must pass controller check");
}

#[tokio::test]
async fn test_controller_is_not_admin() {
    let permission_service = build_dependencies(Some(RoleEntity::Controller)).build_service();
    permission_service
        .check_permission(CONTROLLER_PRIVILEGE, ().auth(), None)
        .await
        .expect("Controller must pass controller check");
    let result = permission_service
        .check_permission(ADMIN_PRIVILEGE, ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_user_has_no_privileges() {
    let permission_service = build_dependencies(Some(RoleEntity::User)).build_service();
    let result = permission_service
        .check_permission(CONTROLLER_PRIVILEGE, ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_unknown_employee_is_forbidden() {
    let permission_service = build_dependencies(None).build_service();
    let result = permission_service
        .check_permission(CONTROLLER_PRIVILEGE, ().auth(), None)
        .await;
    test_forbidden(&result);
}

#[tokio::test]
async fn test_check_user() {
    let permission_service = build_dependencies(Some(RoleEntity::User)).build_service();
    permission_service
        .check_user(current_user_id(), ().auth())
        .await
        .expect("Own user must pass");
    let result = permission_service
        .check_user(other_user_id(), ().auth())
        .await;
    test_forbidden(&result);
    assert_eq!(
        Some(current_user_id()),
        permission_service.current_user_id(().auth()).await.unwrap()
    );
}

#[tokio::test]
async fn test_user_service_returns_context() {
    let user_service = UserServiceImpl;
    assert_eq!(
        other_user_id(),
        user_service.current_user(other_user_id()).await.unwrap()
    );
}
