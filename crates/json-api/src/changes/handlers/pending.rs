//! List Pending Changes Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    changes::{errors::into_status_error, models::ChangeRequestResponse},
    extensions::*,
    state::State,
};

/// List Pending Changes Handler
///
/// Requests awaiting a decision, oldest first.
#[endpoint(
    tags("admin"),
    summary = "List Pending Change Requests",
    responses(
        (status_code = StatusCode::OK, description = "Pending change requests"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<ChangeRequestResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let changes = state
        .app
        .changes
        .list_pending_changes()
        .await
        .map_err(into_status_error)?;

    Ok(Json(changes.into_iter().map(Into::into).collect()))
}
