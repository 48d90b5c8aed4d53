//! Order Errors

use salvo::http::StatusError;
use storefront_app::domain::orders::OrdersServiceError;

use crate::errors::{
    ErrorKind, kind_error, price_mismatch_error, pricing_error, internal_error, totals_error,
    transition_error,
};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::AlreadyExists => kind_error(ErrorKind::Conflict, "Order already exists"),
        OrdersServiceError::NotFound => kind_error(ErrorKind::NotFound, "Order not found"),
        OrdersServiceError::Forbidden => {
            kind_error(ErrorKind::Forbidden, "Order belongs to another member")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            kind_error(ErrorKind::Validation, "Invalid order payload")
        }
        OrdersServiceError::Validation(message) => kind_error(ErrorKind::Validation, message),
        OrdersServiceError::UnavailableProduct(_) => {
            kind_error(ErrorKind::UnavailableProduct, error.to_string())
        }
        OrdersServiceError::PriceMismatch(source) => price_mismatch_error(&source),
        OrdersServiceError::InsufficientMileage => {
            kind_error(ErrorKind::InsufficientMileage, "Not enough mileage")
        }
        OrdersServiceError::InvalidStateTransition(source) => transition_error(&source),
        OrdersServiceError::Pricing(source) => pricing_error(&source),
        OrdersServiceError::Totals(source) => totals_error(&source),
        OrdersServiceError::Sql(source) => internal_error("order query failed", source),
    }
}
