//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{
    orders::{PriceMismatch, TotalsError},
    pricing::PricingError,
    transition::TransitionError,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("order belongs to another member")]
    Forbidden,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("{0}")]
    Validation(String),

    #[error("product {0} cannot be ordered")]
    UnavailableProduct(Uuid),

    #[error(transparent)]
    PriceMismatch(#[from] PriceMismatch),

    #[error("insufficient mileage")]
    InsufficientMileage,

    #[error(transparent)]
    InvalidStateTransition(#[from] TransitionError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Totals(#[from] TotalsError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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
