//! Confirm Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::payments::PaymentOutcome;
use uuid::Uuid;

use storefront_app::domain::orders::data::PaymentConfirmation;

use crate::{
    errors::{ErrorKind, kind_error},
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Confirm Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ConfirmPaymentRequest {
    /// Gateway transaction key
    pub gateway_key: String,

    /// One of `completed`, `failed`, `cancelled`
    pub outcome: String,

    /// Amount the gateway settled
    pub amount: u64,
}

impl TryFrom<ConfirmPaymentRequest> for PaymentConfirmation {
    type Error = StatusError;

    fn try_from(body: ConfirmPaymentRequest) -> Result<Self, Self::Error> {
        let outcome = body
            .outcome
            .parse::<PaymentOutcome>()
            .map_err(|source| kind_error(ErrorKind::Validation, source.to_string()))?;

        Ok(Self {
            gateway_key: body.gateway_key,
            outcome,
            amount: body.amount,
        })
    }
}

/// Confirm Payment Handler
///
/// Gateway callback. A completed payment moves the order to
/// `payment_completed`; a failed or cancelled one cancels the order.
#[endpoint(
    tags("payments"),
    summary = "Confirm Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid confirmation"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Payment already settled or amount differs"),
    ),
)]
#[tracing::instrument(
    name = "payments.confirm",
    skip(order, json, depot),
    fields(order_uuid = tracing::field::Empty, outcome = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<ConfirmPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let order = order.into_inner();
    let confirmation = PaymentConfirmation::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("order_uuid", tracing::field::display(order));
    span.record("outcome", confirmation.outcome.as_str());

    let order = state
        .app
        .orders
        .confirm_payment(order.into(), confirmation)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.try_into()?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use storefront::{
        orders::{DeliveryStatus, PriceMismatch},
        payments::PaymentStatus,
    };
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError, records::OrderUuid};

    use crate::test_helpers::make_order;

    use super::{super::tests::anonymous_orders_service, *};

    fn make_service(orders: MockOrdersService) -> Service {
        anonymous_orders_service(
            orders,
            Router::with_path("payments/{order}/confirm").post(handler),
        )
    }

    #[tokio::test]
    async fn test_completed_payment_returns_paid_order() -> TestResult {
        let uuid = OrderUuid::new();
        let mut order = make_order(uuid);

        order.order.delivery_status = DeliveryStatus::PaymentCompleted;
        order.payment.status = PaymentStatus::Completed;
        order.payment.gateway_key = Some("pg_123".to_string());

        let mut orders = MockOrdersService::new();

        orders
            .expect_confirm_payment()
            .once()
            .withf(move |o, confirmation| {
                *o == uuid
                    && confirmation.outcome == PaymentOutcome::Completed
                    && confirmation.amount == 27_000
                    && confirmation.gateway_key == "pg_123"
            })
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::post(format!("http://example.com/payments/{uuid}/confirm"))
            .json(&json!({ "gateway_key": "pg_123", "outcome": "completed", "amount": 27_000 }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.order.delivery_status, "payment_completed");
        assert_eq!(body.payment.gateway_key.as_deref(), Some("pg_123"));

        Ok(())
    }

    #[tokio::test]
    async fn test_amount_mismatch_returns_409() {
        let mut orders = MockOrdersService::new();

        orders.expect_confirm_payment().once().return_once(|_, _| {
            Err(OrdersServiceError::PriceMismatch(PriceMismatch {
                field: "amount",
                declared: 1,
                computed: 27_000,
            }))
        });

        let res = TestClient::post(format!("http://example.com/payments/{}/confirm", Uuid::now_v7()))
            .json(&json!({ "gateway_key": "pg_123", "outcome": "completed", "amount": 1 }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_unknown_outcome_returns_400() {
        let res = TestClient::post(format!("http://example.com/payments/{}/confirm", Uuid::now_v7()))
            .json(&json!({ "gateway_key": "pg_123", "outcome": "pending", "amount": 27_000 }))
            .send(&make_service(MockOrdersService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }
}
