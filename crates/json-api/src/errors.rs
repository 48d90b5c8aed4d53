//! Error kinds shared by every route.
//!
//! Each failure is rendered as a [`StatusError`] whose `detail` carries a
//! stable machine-readable kind and whose `brief` is meant for people.

use std::fmt::Display;

use salvo::http::StatusError;
use storefront::{
    orders::{PriceMismatch, TotalsError},
    pricing::PricingError,
    selection::SelectionError,
    transition::TransitionError,
};
use tracing::error;

/// Stable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorKind {
    Validation,
    NotFound,
    Forbidden,
    Conflict,
    UnavailableProduct,
    PriceMismatch,
    InsufficientMileage,
    InvalidStateTransition,
    DataIntegrity,
    Internal,
}

impl ErrorKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation_error",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::UnavailableProduct => "unavailable_product",
            Self::PriceMismatch => "price_mismatch",
            Self::InsufficientMileage => "insufficient_mileage",
            Self::InvalidStateTransition => "invalid_state_transition",
            Self::DataIntegrity => "data_integrity_error",
            Self::Internal => "internal_error",
        }
    }

    fn status(self) -> StatusError {
        match self {
            Self::Validation => StatusError::bad_request(),
            Self::NotFound => StatusError::not_found(),
            Self::Forbidden => StatusError::forbidden(),
            Self::Conflict | Self::PriceMismatch | Self::InvalidStateTransition => {
                StatusError::conflict()
            }
            Self::UnavailableProduct | Self::InsufficientMileage => {
                StatusError::unprocessable_entity()
            }
            Self::DataIntegrity | Self::Internal => StatusError::internal_server_error(),
        }
    }
}

/// Build a response error of `kind`.
pub(crate) fn kind_error(kind: ErrorKind, brief: impl Into<String>) -> StatusError {
    kind.status().brief(brief).detail(kind.as_str())
}

/// Log an unexpected failure and hide it behind a generic 500.
pub(crate) fn internal_error(context: &str, source: impl Display) -> StatusError {
    error!("{context}: {source}");

    kind_error(ErrorKind::Internal, "Internal server error")
}

pub(crate) fn selection_error(source: &SelectionError) -> StatusError {
    kind_error(ErrorKind::Validation, source.to_string())
}

pub(crate) fn pricing_error(source: &PricingError) -> StatusError {
    match source {
        PricingError::ProductNotFound(_) => kind_error(ErrorKind::NotFound, source.to_string()),
        PricingError::InvalidQuantity => quantity_error(),
        _ if source.is_data_integrity() => {
            error!("catalog data rejected by pricing: {source}");

            kind_error(ErrorKind::DataIntegrity, "Catalog pricing data is inconsistent")
        }
        _ => kind_error(ErrorKind::Validation, source.to_string()),
    }
}

/// A quantity below one is an invalid state for a line, not a malformed request.
pub(crate) fn quantity_error() -> StatusError {
    kind_error(ErrorKind::InvalidStateTransition, "quantity must be at least 1")
}

/// A stored line whose total does not fit is corrupt catalog or order data.
pub(crate) fn line_total_error() -> StatusError {
    error!("stored line total overflowed");

    kind_error(ErrorKind::DataIntegrity, "Line total could not be computed")
}

pub(crate) fn transition_error(source: &TransitionError) -> StatusError {
    kind_error(ErrorKind::InvalidStateTransition, source.to_string())
}

pub(crate) fn price_mismatch_error(source: &PriceMismatch) -> StatusError {
    kind_error(ErrorKind::PriceMismatch, source.to_string())
}

pub(crate) fn totals_error(source: &TotalsError) -> StatusError {
    match source {
        TotalsError::EmptyOrder | TotalsError::MileageExceedsPayable { .. } => {
            kind_error(ErrorKind::Validation, source.to_string())
        }
        TotalsError::Overflow => {
            error!("order totals overflowed: {source}");

            kind_error(ErrorKind::DataIntegrity, "Order totals could not be computed")
        }
    }
}
