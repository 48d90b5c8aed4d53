//! Catalog Errors

use salvo::http::StatusError;
use storefront_app::domain::catalog::CatalogServiceError;

use crate::errors::{ErrorKind, kind_error, pricing_error, internal_error};

pub(crate) fn into_status_error(error: CatalogServiceError) -> StatusError {
    match error {
        CatalogServiceError::AlreadyExists => {
            kind_error(ErrorKind::Conflict, "Catalog entry already exists")
        }
        CatalogServiceError::NotFound => kind_error(ErrorKind::NotFound, "Product not found"),
        CatalogServiceError::InvalidReference
        | CatalogServiceError::MissingRequiredData
        | CatalogServiceError::InvalidData => {
            kind_error(ErrorKind::Validation, "Invalid catalog payload")
        }
        CatalogServiceError::AmbiguousOption(_) => {
            kind_error(ErrorKind::Validation, error.to_string())
        }
        CatalogServiceError::Pricing(source) => pricing_error(&source),
        CatalogServiceError::Sql(source) => internal_error("catalog query failed", source),
    }
}
