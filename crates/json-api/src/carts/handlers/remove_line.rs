//! Remove Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::data::CartLineKey;

use crate::{
    carts::errors::into_status_error, catalog::models::SelectionBody, extensions::*,
    state::State,
};

/// Remove Cart Line Request
///
/// Lines are matched by product and exact selection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RemoveCartLineRequest {
    pub product_uuid: Uuid,
    #[serde(default)]
    pub selection: SelectionBody,
}

/// Remove Cart Line Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Line",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Line removed"),
        (status_code = StatusCode::NOT_FOUND, description = "No line holds that selection"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RemoveCartLineRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<(), StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;
    let request = json.into_inner();

    let key = CartLineKey {
        product_uuid: request.product_uuid.into(),
        selection: request.selection.into_selection()?,
    };

    state
        .app
        .carts
        .remove_line(member, key)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::NO_CONTENT);

    Ok(())
}
