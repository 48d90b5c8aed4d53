//! Toggle Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartLineResponse},
    extensions::*,
    state::State,
};

/// Toggle Cart Line Handler
///
/// Flips whether the line is included in checkout.
#[endpoint(tags("cart"), summary = "Toggle Cart Line")]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let line = state
        .app
        .carts
        .toggle_checked(member, line.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.try_into()?))
}
