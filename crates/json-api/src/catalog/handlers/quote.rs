//! Quote Handler

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
    catalog::{
        errors::into_status_error,
        models::{QuoteResponse, SelectionBody},
    },
    errors::quantity_error,
    extensions::*,
    state::State,
};

/// Quote Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteRequest {
    #[serde(default)]
    pub selection: SelectionBody,
    pub quantity: u32,
}

/// Quote Handler
///
/// Prices a selection against the current catalog. Nothing is stored.
#[endpoint(
    tags("catalog"),
    summary = "Quote Product Price",
    responses(
        (status_code = StatusCode::OK, description = "Price quote"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid selection"),
        (status_code = StatusCode::CONFLICT, description = "Quantity below 1"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<QuoteRequest>,
    depot: &mut Depot,
) -> Result<Json<QuoteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    if request.quantity == 0 {
        return Err(quantity_error());
    }

    let quote = state
        .app
        .catalog
        .quote(
            product.into_inner().into(),
            request.selection.into_selection()?,
            request.quantity,
        )
        .await
        .map_err(into_status_error)?;

    Ok(Json(quote.into()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::{
        pricing::{PriceQuote, PricingError},
        selection::OptionSelection,
    };
    use testresult::TestResult;

    use storefront_app::{
        context::AppContext,
        domain::catalog::{CatalogServiceError, MockCatalogService, records::ProductUuid},
    };

    use crate::test_helpers::{app_context, member_service};

    use super::*;

    fn make_service(catalog: MockCatalogService) -> Service {
        member_service(
            AppContext {
                catalog: Arc::new(catalog),
                ..app_context()
            },
            Router::with_path("products/{product}/quote").post(handler),
        )
    }

    #[tokio::test]
    async fn test_quote_returns_line_prices() -> TestResult {
        let uuid = ProductUuid::new();
        let large = Uuid::now_v7();

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_quote()
            .once()
            .withf(move |product, selection, quantity| {
                *product == uuid && selection.values() == [large] && *quantity == 2
            })
            .return_once(move |_, _, _| {
                Ok(PriceQuote {
                    product_uuid: uuid.into_uuid(),
                    list_price: 10_000,
                    base_price: 10_000,
                    option_price: 2_000,
                    list_unit_price: 12_000,
                    unit_price: 12_000,
                    quantity: 2,
                    list_total: 24_000,
                    line_total: 24_000,
                })
            });

        let mut res = TestClient::post(format!("http://example.com/products/{uuid}/quote"))
            .json(&json!({ "selection": { "option_values": [large] }, "quantity": 2 }))
            .send(&make_service(catalog))
            .await;

        let body: QuoteResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.unit_price, 12_000);
        assert_eq!(body.line_total, 24_000);
        assert_eq!(body.discount_total, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_quote_missing_required_option_returns_400() {
        let uuid = ProductUuid::new();

        let mut catalog = MockCatalogService::new();

        catalog
            .expect_quote()
            .once()
            .withf(|_, selection, _| *selection == OptionSelection::None)
            .return_once(|_, _, _| {
                Err(CatalogServiceError::Pricing(
                    PricingError::MissingRequiredOption("Size".to_string()),
                ))
            });

        let res = TestClient::post(format!("http://example.com/products/{uuid}/quote"))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(catalog))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_quote_zero_quantity_is_rejected_before_pricing() {
        let uuid = ProductUuid::new();

        let res = TestClient::post(format!("http://example.com/products/{uuid}/quote"))
            .json(&json!({ "quantity": 0 }))
            .send(&make_service(MockCatalogService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_quote_duplicate_values_return_400() {
        let uuid = ProductUuid::new();
        let large = Uuid::now_v7();

        let res = TestClient::post(format!("http://example.com/products/{uuid}/quote"))
            .json(&json!({ "selection": { "option_values": [large, large] }, "quantity": 1 }))
            .send(&make_service(MockCatalogService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
