//! Change Request Errors

use salvo::http::StatusError;
use storefront_app::domain::changes::ChangesServiceError;

use crate::errors::{ErrorKind, kind_error, internal_error, transition_error};

pub(crate) fn into_status_error(error: ChangesServiceError) -> StatusError {
    match error {
        ChangesServiceError::AlreadyExists => {
            kind_error(ErrorKind::Conflict, "Change request already exists")
        }
        ChangesServiceError::NotFound => {
            kind_error(ErrorKind::NotFound, "Change request or order line not found")
        }
        ChangesServiceError::Forbidden => {
            kind_error(ErrorKind::Forbidden, "Order line belongs to another member")
        }
        ChangesServiceError::InvalidReference => {
            kind_error(ErrorKind::NotFound, "Order line not found")
        }
        ChangesServiceError::MissingRequiredData | ChangesServiceError::InvalidData => {
            kind_error(ErrorKind::Validation, "Invalid change request payload")
        }
        ChangesServiceError::Validation(message) => kind_error(ErrorKind::Validation, message),
        ChangesServiceError::InvalidStateTransition(source) => transition_error(&source),
        ChangesServiceError::Sql(source) => internal_error("change request query failed", source),
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;
    use storefront::transition::TransitionError;

    use super::*;

    #[test]
    fn resolved_request_maps_to_conflict() {
        let error = into_status_error(ChangesServiceError::InvalidStateTransition(
            TransitionError::new("change request", "approved", "resolve"),
        ));

        assert_eq!(error.code, StatusCode::CONFLICT);
        assert_eq!(error.detail.as_deref(), Some("invalid_state_transition"));
    }

    #[test]
    fn blank_reason_maps_to_bad_request() {
        let error = into_status_error(ChangesServiceError::Validation(
            "reason must not be blank".to_string(),
        ));

        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.brief, "reason must not be blank");
    }
}
