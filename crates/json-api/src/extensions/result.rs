//! Result helpers for handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;

use crate::errors::internal_error;

/// Turn an unexpected failure into a logged `internal_error`.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| internal_error(context, error))
    }
}
