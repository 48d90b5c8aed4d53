//! Add Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::data::NewCartLine;

use crate::{
    carts::{errors::into_status_error, models::CartLineResponse},
    catalog::models::SelectionBody,
    errors::quantity_error,
    extensions::*,
    state::State,
};

/// Add Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartLineRequest {
    pub product_uuid: Uuid,
    #[serde(default)]
    pub selection: SelectionBody,
    pub quantity: u32,
}

impl AddCartLineRequest {
    fn into_new_line(self) -> Result<NewCartLine, StatusError> {
        if self.quantity == 0 {
            return Err(quantity_error());
        }

        Ok(NewCartLine {
            product_uuid: self.product_uuid.into(),
            selection: self.selection.into_selection()?,
            quantity: self.quantity,
        })
    }
}

/// Add Cart Line Handler
///
/// Adding a product and selection already in the cart increases that line's
/// quantity instead of creating a second line.
#[endpoint(
    tags("cart"),
    summary = "Add Cart Line",
    responses(
        (status_code = StatusCode::CREATED, description = "Line added or merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid selection"),
        (status_code = StatusCode::CONFLICT, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
#[tracing::instrument(
    name = "cart.add_line",
    skip(json, depot, res),
    fields(member_uuid = tracing::field::Empty, product_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartLineRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartLineResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;
    let line = json.into_inner().into_new_line()?;

    let span = tracing::Span::current();

    span.record("member_uuid", tracing::field::display(member));
    span.record("product_uuid", tracing::field::display(line.product_uuid));

    let line = state
        .app
        .carts
        .add_line(member, line)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(line.try_into()?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::{pricing::PricingError, selection::OptionSelection};
    use testresult::TestResult;

    use storefront_app::domain::{
        carts::{CartsServiceError, MockCartsService, records::CartLineUuid},
        catalog::records::ProductUuid,
    };

    use crate::test_helpers::{TEST_MEMBER_UUID, make_cart_line};

    use super::{super::tests::carts_service, *};

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/lines").post(handler))
    }

    #[tokio::test]
    async fn test_add_line_returns_201() -> TestResult {
        let product = ProductUuid::new();
        let large = Uuid::now_v7();
        let line = make_cart_line(CartLineUuid::new());

        let mut carts = MockCartsService::new();

        carts
            .expect_add_line()
            .once()
            .withf(move |member, new| {
                *member == TEST_MEMBER_UUID
                    && new.product_uuid == product
                    && new.selection.values() == [large]
                    && new.quantity == 2
            })
            .return_once(move |_, _| Ok(line));

        let mut res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({
                "product_uuid": product.into_uuid(),
                "selection": { "option_values": [large] },
                "quantity": 2,
            }))
            .send(&make_service(carts))
            .await;

        let body: CartLineResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.unit_price, 12_000);
        assert_eq!(body.line_total, 24_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_line_without_selection_sends_none() {
        let product = ProductUuid::new();
        let line = make_cart_line(CartLineUuid::new());

        let mut carts = MockCartsService::new();

        carts
            .expect_add_line()
            .once()
            .withf(|_, new| new.selection == OptionSelection::None)
            .return_once(move |_, _| Ok(line));

        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": product.into_uuid(), "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
    }

    #[tokio::test]
    async fn test_add_line_zero_quantity_returns_409() {
        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": Uuid::now_v7(), "quantity": 0 }))
            .send(&make_service(MockCartsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_add_line_option_of_other_product_returns_400() {
        let value = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_line()
            .once()
            .return_once(move |_, _| {
                Err(CartsServiceError::Pricing(PricingError::AmbiguousOption(value)))
            });

        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({
                "product_uuid": Uuid::now_v7(),
                "selection": { "option_values": [value] },
                "quantity": 1,
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_add_line_unknown_product_returns_404() {
        let missing = Uuid::now_v7();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_line()
            .once()
            .return_once(move |_, _| {
                Err(CartsServiceError::Pricing(PricingError::ProductNotFound(missing)))
            });

        let res = TestClient::post("http://example.com/cart/lines")
            .json(&json!({ "product_uuid": missing, "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
