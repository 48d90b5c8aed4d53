//! Update Cart Line Quantity Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartLineResponse},
    extensions::*,
    state::State,
};

/// Update Quantity Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateQuantityRequest {
    /// New quantity, at least 1
    pub quantity: i64,
}

/// Update Cart Line Quantity Handler
#[endpoint(
    tags("cart"),
    summary = "Update Cart Line Quantity",
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::CONFLICT, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Line not found"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    json: JsonBody<UpdateQuantityRequest>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let line = state
        .app
        .carts
        .update_quantity(member, line.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.try_into()?))
}
