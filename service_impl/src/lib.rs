use async_trait::async_trait;
use service::user_service::UserService;
use service::ServiceError;
use uuid::Uuid;

pub mod clock;
pub mod config;
pub mod day_entry;
pub mod employee;
pub mod leave_request;
pub mod macros;
pub mod permission;
pub mod phrase;
pub mod report;
pub mod schedule;
pub mod settings;
pub mod statistics;
pub mod uuid_service;

#[cfg(test)]
mod test;

pub use permission::PermissionServiceImpl;

/// The context is the id of the employee acting on the command line.
pub struct UserServiceImpl;

#[async_trait]
impl UserService for UserServiceImpl {
    type Context = Uuid;

    async fn current_user(&self, context: Self::Context) -> Result<Uuid, ServiceError> {
        Ok(context)
    }
}
