//! List Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderSummaryResponse},
    state::State,
};

/// List Orders Handler
///
/// The member's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderSummaryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let orders = state
        .app
        .orders
        .list_orders(member)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
