//! Cancel Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Cancel Order Handler
///
/// Only orders still awaiting payment or preparation, with every line
/// untouched, can be cancelled. Mileage is refunded and the payment voided.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    responses(
        (status_code = StatusCode::OK, description = "Order cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
    ),
)]
#[tracing::instrument(
    name = "orders.cancel",
    skip(order, depot),
    fields(order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;
    let order = order.into_inner();

    tracing::Span::current().record("order_uuid", tracing::field::display(order));

    let order = state
        .app
        .orders
        .cancel_order(member, order.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.try_into()?))
}
