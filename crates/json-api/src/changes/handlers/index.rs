//! List Member Changes Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    changes::{errors::into_status_error, models::ChangeRequestResponse},
    extensions::*,
    state::State,
};

/// List Member Changes Handler
#[endpoint(
    tags("changes"),
    summary = "List Change Requests",
    responses(
        (status_code = StatusCode::OK, description = "The member's change requests"),
    ),
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<Vec<ChangeRequestResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let changes = state
        .app
        .changes
        .list_member_changes(member)
        .await
        .map_err(into_status_error)?;

    Ok(Json(changes.into_iter().map(Into::into).collect()))
}
