//! Cart Errors

use salvo::http::StatusError;
use storefront_app::domain::carts::CartsServiceError;

use crate::errors::{ErrorKind, internal_error, kind_error, pricing_error, quantity_error};

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => {
            kind_error(ErrorKind::Conflict, "Cart line already exists")
        }
        CartsServiceError::NotFound => kind_error(ErrorKind::NotFound, "Cart line not found"),
        CartsServiceError::InvalidReference => {
            kind_error(ErrorKind::NotFound, "Product not found")
        }
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            kind_error(ErrorKind::Validation, "Invalid cart payload")
        }
        CartsServiceError::InvalidQuantity => quantity_error(),
        CartsServiceError::Pricing(source) => pricing_error(&source),
        CartsServiceError::Sql(source) => internal_error("cart query failed", source),
    }
}
