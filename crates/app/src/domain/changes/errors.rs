//! Changes service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::transition::TransitionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChangesServiceError {
    #[error("change request already exists")]
    AlreadyExists,

    #[error("change request or order line not found")]
    NotFound,

    #[error("order line belongs to another member")]
    Forbidden,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InvalidStateTransition(#[from] TransitionError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ChangesServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
