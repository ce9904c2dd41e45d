use std::fmt::Debug;

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

pub mod absence;
pub mod day_note;
pub mod employee;
pub mod leave_request;
pub mod manual_hours;
pub mod overtime;
pub mod phrase;
pub mod report;
pub mod settings;
pub mod shift_override;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("Uuid parse error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Date parse error: {0}")]
    DateParseError(#[from] time::error::Parse),

    #[error("Date format error: {0}")]
    DateFormatError(#[from] time::error::Format),

    #[error("Date utils error: {0}")]
    DateUtilsError(#[from] skiftplan_utils::DateUtilsError),

    #[error("Enum value not found: {0}")]
    EnumValueNotFound(std::sync::Arc<str>),
}

pub trait Transaction: Clone + Debug + Send + Sync + 'static {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTransaction;
impl Transaction for MockTransaction {}

#[automock(type Transaction = MockTransaction;)]
#[async_trait]
pub trait TransactionDao {
    type Transaction: Transaction;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError>;
    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError>;
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError>;
}
