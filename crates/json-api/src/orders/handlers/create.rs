//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::{orders::DeclaredTotals, payments::PaymentMethod};
use uuid::Uuid;

use storefront_app::domain::orders::{
    data::{NewOrder, NewOrderLine},
    records::OrderUuid,
};

use crate::{
    catalog::models::SelectionBody,
    errors::{ErrorKind, kind_error},
    extensions::*,
    observability::record_order_created,
    orders::{
        errors::into_status_error,
        models::{OrderResponse, RecipientBody},
    },
    state::State,
};

/// Order Line Request
///
/// Prices are what the client showed the customer; the server recomputes
/// them and refuses any difference.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineRequest {
    pub product_uuid: Uuid,
    #[serde(default)]
    pub selection: SelectionBody,
    pub quantity: u32,
    pub base_price: u64,
    pub option_price: i64,
}

/// Declared Totals
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeclaredTotalsRequest {
    pub total_price: u64,
    pub discount_price: u64,
    pub delivery_price: u64,
    pub final_price: u64,
}

/// Create Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    /// Client-chosen order id; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub recipient: RecipientBody,
    pub lines: Vec<OrderLineRequest>,

    /// One of `card`, `bank_transfer`, `virtual_account`, `mobile`
    pub payment_method: String,

    pub totals: DeclaredTotalsRequest,

    /// Mileage to spend
    #[serde(default)]
    pub mileage: u64,
}

impl CreateOrderRequest {
    fn into_new_order(self) -> Result<NewOrder, StatusError> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|source| kind_error(ErrorKind::Validation, source.to_string()))?;

        let lines = self
            .lines
            .into_iter()
            .map(|line| {
                Ok(NewOrderLine {
                    product_uuid: line.product_uuid.into(),
                    selection: line.selection.into_selection()?,
                    quantity: line.quantity,
                    declared_base_price: line.base_price,
                    declared_option_price: line.option_price,
                })
            })
            .collect::<Result<Vec<_>, StatusError>>()?;

        Ok(NewOrder {
            uuid: self.uuid.map_or_else(OrderUuid::new, OrderUuid::from_uuid),
            recipient: self.recipient.into(),
            lines,
            payment_method,
            declared: DeclaredTotals {
                total_price: self.totals.total_price,
                discount_price: self.totals.discount_price,
                delivery_price: self.totals.delivery_price,
                final_price: self.totals.final_price,
            },
            mileage: self.mileage,
        })
    }
}

/// Create Order Handler
///
/// Checks out the given lines in one transaction: prices are re-verified,
/// mileage is debited, the lines leave the cart and a pending payment is
/// recorded.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid order"),
        (status_code = StatusCode::CONFLICT, description = "Declared prices are stale"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Product unavailable or not enough mileage"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        member_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty,
        lines = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;
    let order = json.into_inner().into_new_order()?;

    let span = tracing::Span::current();

    span.record("member_uuid", tracing::field::display(member));
    span.record("order_uuid", tracing::field::display(order.uuid));
    span.record("lines", order.lines.len());

    let order = state
        .app
        .orders
        .create_order(member, order)
        .await
        .map_err(into_status_error)?;

    record_order_created();

    tracing::info!(
        order_number = %order.order.order_number,
        final_price = order.order.final_price,
        "created order"
    );

    res.add_header(LOCATION, format!("/orders/{}", order.order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.try_into()?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use storefront::orders::PriceMismatch;
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::test_helpers::{TEST_MEMBER_UUID, make_order};

    use super::{super::tests::orders_service, *};

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").post(handler))
    }

    fn order_body(uuid: Uuid, final_price: u64) -> Value {
        json!({
            "uuid": uuid,
            "recipient": {
                "name": "Kim Minji",
                "phone": "010-1234-5678",
                "postal_code": "04524",
                "address": "110 Sejong-daero",
                "address_detail": "Unit 1203",
            },
            "lines": [{
                "product_uuid": Uuid::now_v7(),
                "selection": { "option_values": [Uuid::now_v7()] },
                "quantity": 2,
                "base_price": 10_000,
                "option_price": 2_000,
            }],
            "payment_method": "card",
            "totals": {
                "total_price": 24_000,
                "discount_price": 0,
                "delivery_price": 3_000,
                "final_price": final_price,
            },
        })
    }

    #[tokio::test]
    async fn test_create_order_returns_201_with_location() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_order(uuid);

        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .withf(move |member, new| {
                *member == TEST_MEMBER_UUID
                    && new.uuid == uuid
                    && new.payment_method == PaymentMethod::Card
                    && new.declared.final_price == 27_000
                    && new.mileage == 0
                    && new.lines.len() == 1
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&order_body(uuid.into_uuid(), 27_000))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(body.order.delivery_status, "payment_pending");
        assert_eq!(body.payment.status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_understated_total_returns_409() {
        let mut orders = MockOrdersService::new();

        orders.expect_create_order().once().return_once(|_, _| {
            Err(OrdersServiceError::PriceMismatch(PriceMismatch {
                field: "final_price",
                declared: 20_000,
                computed: 27_000,
            }))
        });

        let res = TestClient::post("http://example.com/orders")
            .json(&order_body(Uuid::now_v7(), 20_000))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_unavailable_product_returns_422() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::UnavailableProduct(Uuid::nil())));

        let res = TestClient::post("http://example.com/orders")
            .json(&order_body(Uuid::now_v7(), 27_000))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_insufficient_mileage_returns_422() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_create_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::InsufficientMileage));

        let res = TestClient::post("http://example.com/orders")
            .json(&order_body(Uuid::now_v7(), 27_000))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400() -> TestResult {
        let mut body = order_body(Uuid::now_v7(), 27_000);

        *body
            .get_mut("payment_method")
            .ok_or("missing payment_method")? = json!("cheque");

        let res = TestClient::post("http://example.com/orders")
            .json(&body)
            .send(&make_service(MockOrdersService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
