use std::sync::Arc;

use skiftplan_utils::DateUtilsError;
use thiserror::Error;
use uuid::Uuid;

pub mod calendar;
pub mod clock;
pub mod config;
pub mod day_entry;
pub mod employee;
pub mod leave;
pub mod permission;
pub mod phrase;
pub mod report;
pub mod rotation;
pub mod schedule;
pub mod settings;
pub mod statistics;
pub mod user_service;
pub mod uuid_service;

pub use permission::MockPermissionService;
pub use permission::PermissionService;

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationFailureItem {
    ModificationNotAllowed(Arc<str>),
    InvalidValue(Arc<str>),
    MissingValue(Arc<str>),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("Forbidden")]
    Forbidden,

    #[error("Entity {0} not found")]
    EntityNotFound(Uuid),

    #[error("Validation error: {0:?}")]
    ValidationError(Arc<[ValidationFailureItem]>),

    #[error("ID cannot be set on create")]
    IdSetOnCreate,

    #[error("Created cannot be set on create")]
    CreatedSetOnCreate,

    #[error("Date order wrong. {0} must is not smaller or equal to {1}")]
    DateOrderWrong(time::Date, time::Date),

    #[error("An employee named {0} already exists")]
    NameAlreadyExists(Arc<str>),

    #[error("The phrase {0} already exists")]
    PhraseAlreadyExists(Arc<str>),

    #[error("No working time between {0} and {1}")]
    NoWorkingDaysInRange(time::Date, time::Date),

    #[error("Leave request {0} is not pending")]
    LeaveRequestNotPending(Uuid),

    #[error("Internal error")]
    InternalError,
}

impl ServiceError {
    pub fn invalid_value(field: &str) -> Self {
        Self::ValidationError(Arc::new([ValidationFailureItem::InvalidValue(
            field.into(),
        )]))
    }

    pub fn missing_value(field: &str) -> Self {
        Self::ValidationError(Arc::new([ValidationFailureItem::MissingValue(
            field.into(),
        )]))
    }
}

impl From<DateUtilsError> for ServiceError {
    fn from(err: DateUtilsError) -> Self {
        match err {
            DateUtilsError::DateOrderWrong(from, to) => Self::DateOrderWrong(from, to),
            DateUtilsError::DateError(err) => Self::invalid_value(err.name()),
            DateUtilsError::ParseError(_) => Self::invalid_value("date"),
            DateUtilsError::FormatError(_) => Self::InternalError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skiftplan_utils::DateRange;
    use time::macros::date;

    #[test]
    fn test_date_utils_error_mapping() {
        let result: Result<DateRange, ServiceError> =
            DateRange::new(date!(2024 - 02 - 02), date!(2024 - 02 - 01)).map_err(Into::into);
        assert!(matches!(
            result,
            Err(ServiceError::DateOrderWrong(from, to))
                if from == date!(2024 - 02 - 02) && to == date!(2024 - 02 - 01)
        ));

        let result: Result<DateRange, ServiceError> =
            DateRange::month(2024, 13).map_err(Into::into);
        assert!(matches!(result, Err(ServiceError::ValidationError(_))));
    }
}
