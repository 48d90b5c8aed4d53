//! Set All Checked Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Set All Checked Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetCheckedRequest {
    pub checked: bool,
}

/// Set All Checked Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetCheckedResponse {
    /// Lines whose flag changed
    pub updated: u64,
}

/// Set All Checked Handler
#[endpoint(tags("cart"), summary = "Check or Uncheck Every Line")]
pub(crate) async fn handler(
    json: JsonBody<SetCheckedRequest>,
    depot: &mut Depot,
) -> Result<Json<SetCheckedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let updated = state
        .app
        .carts
        .set_all_checked(member, json.into_inner().checked)
        .await
        .map_err(into_status_error)?;

    Ok(Json(SetCheckedResponse { updated }))
}
