//! Update Delivery Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::orders::DeliveryStatus;
use uuid::Uuid;

use storefront_app::domain::orders::data::DeliveryUpdate;

use crate::{
    errors::{ErrorKind, kind_error},
    extensions::*,
    orders::{errors::into_status_error, models::OrderSummaryResponse},
    state::State,
};

/// Delivery Update Body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryUpdateBody {
    pub order_uuid: Uuid,

    /// One of `payment_pending`, `payment_completed`, `preparing`,
    /// `shipping`, `delivered`, `order_canceled`
    pub delivery_status: String,

    #[serde(default)]
    pub carrier: Option<String>,

    #[serde(default)]
    pub tracking_number: Option<String>,
}

impl TryFrom<DeliveryUpdateBody> for DeliveryUpdate {
    type Error = StatusError;

    fn try_from(body: DeliveryUpdateBody) -> Result<Self, Self::Error> {
        let delivery_status = body
            .delivery_status
            .parse::<DeliveryStatus>()
            .map_err(|source| kind_error(ErrorKind::Validation, source.to_string()))?;

        Ok(Self {
            order_uuid: body.order_uuid.into(),
            delivery_status,
            carrier: body.carrier,
            tracking_number: body.tracking_number,
        })
    }
}

/// Update Delivery Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateDeliveryRequest {
    pub updates: Vec<DeliveryUpdateBody>,
}

/// Update Delivery Handler
///
/// Applies every update or none of them.
#[endpoint(
    tags("admin"),
    summary = "Update Delivery",
    responses(
        (status_code = StatusCode::OK, description = "Orders updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid update"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Status cannot move that way"),
    ),
)]
#[tracing::instrument(
    name = "orders.update_delivery",
    skip(json, depot),
    fields(updates = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateDeliveryRequest>,
    depot: &mut Depot,
) -> Result<Json<Vec<OrderSummaryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let updates = json
        .into_inner()
        .updates
        .into_iter()
        .map(DeliveryUpdate::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::Span::current().record("updates", updates.len());

    let orders = state
        .app
        .orders
        .update_delivery(updates)
        .await
        .map_err(into_status_error)?;

    Ok(Json(orders.into_iter().map(Into::into).collect()))
}
