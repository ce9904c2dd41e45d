use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::ServiceError;

#[automock(type Context=();)]
#[async_trait]
pub trait UserService {
    type Context: Clone + Send + Sync + 'static;

    /// Employee id of the authenticated user.
    async fn current_user(&self, context: Self::Context) -> Result<Uuid, ServiceError>;
}
