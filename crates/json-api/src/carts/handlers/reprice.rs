//! Reprice Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, models::CartLineResponse},
    extensions::*,
    state::State,
};

/// Reprice Cart Line Handler
///
/// Replaces the line's price snapshot with the current catalog price.
#[endpoint(
    tags("cart"),
    summary = "Reprice Cart Line",
    responses(
        (status_code = StatusCode::OK, description = "Line repriced"),
        (status_code = StatusCode::NOT_FOUND, description = "Line or product not found"),
    ),
)]
pub(crate) async fn handler(
    line: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let line = state
        .app
        .carts
        .reprice_line(member, line.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.try_into()?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront::pricing::PricingError;
    use testresult::TestResult;

    use storefront_app::domain::carts::{
        CartsServiceError, MockCartsService, records::CartLineUuid,
    };

    use crate::test_helpers::make_cart_line;

    use super::{super::tests::carts_service, *};

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(
            carts,
            Router::with_path("cart/lines/{line}/reprice").post(handler),
        )
    }

    #[tokio::test]
    async fn test_reprice_returns_new_snapshot() -> TestResult {
        let uuid = CartLineUuid::new();
        let mut line = make_cart_line(uuid);

        line.base_price = 15_000;
        line.unit_price = 17_000;

        let mut carts = MockCartsService::new();

        carts
            .expect_reprice_line()
            .once()
            .withf(move |_, u| *u == uuid)
            .return_once(move |_, _| Ok(line));

        let mut res = TestClient::post(format!("http://example.com/cart/lines/{uuid}/reprice"))
            .send(&make_service(carts))
            .await;

        let body: CartLineResponse = res.take_json().await?;

        assert_eq!(body.unit_price, 17_000);
        assert_eq!(body.line_total, 34_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_reprice_against_broken_catalog_returns_500() {
        let uuid = CartLineUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_reprice_line()
            .once()
            .return_once(|_, _| Err(CartsServiceError::Pricing(PricingError::NegativePrice(-500))));

        let res = TestClient::post(format!("http://example.com/cart/lines/{uuid}/reprice"))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
