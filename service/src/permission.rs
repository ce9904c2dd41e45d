use std::fmt::Debug;

use async_trait::async_trait;
use dao::MockTransaction;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

/// Granted to administrators. Allows editing everybody's data and deciding requests.
pub const ADMIN_PRIVILEGE: &str = "admin";
/// Granted to administrators and controllers. Allows reading everybody's data.
pub const CONTROLLER_PRIVILEGE: &str = "controller";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authentication<Context: Clone + PartialEq + Eq + Send + Sync + Debug + 'static> {
    Full,
    Context(Context),
}
impl<Context: Clone + Debug + PartialEq + Eq + Send + Sync + 'static> From<Context>
    for Authentication<Context>
{
    fn from(context: Context) -> Self {
        Self::Context(context)
    }
}

#[automock(type Context=(); type Transaction = MockTransaction;)]
#[async_trait]
pub trait PermissionService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction;

    /// `None` for full authentication.
    async fn current_user_id(
        &self,
        context: Authentication<Self::Context>,
    ) -> Result<Option<Uuid>, ServiceError>;

    async fn check_permission(
        &self,
        privilege: &str,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<(), ServiceError>;

    /// Succeeds if the authenticated user is the given employee.
    async fn check_user(
        &self,
        user_id: Uuid,
        context: Authentication<Self::Context>,
    ) -> Result<(), ServiceError>;
}
