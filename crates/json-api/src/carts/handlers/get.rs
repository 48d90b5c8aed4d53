//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, models::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
///
/// Returns the member's cart lines, oldest first.
#[endpoint(tags("cart"), summary = "Get Cart")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(member)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.try_into()?))
}
