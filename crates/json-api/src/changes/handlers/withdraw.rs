//! Withdraw Change Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    changes::{errors::into_status_error, models::OrderDetailResponse},
    extensions::*,
    state::State,
};

/// Withdraw Change Handler
///
/// Deletes a pending request and returns the line, back to `ordered`.
#[endpoint(
    tags("changes"),
    summary = "Withdraw Change Request",
    responses(
        (status_code = StatusCode::OK, description = "Request withdrawn"),
        (status_code = StatusCode::FORBIDDEN, description = "Request belongs to another member"),
        (status_code = StatusCode::NOT_FOUND, description = "Request not found"),
        (status_code = StatusCode::CONFLICT, description = "Request already resolved"),
    ),
)]
pub(crate) async fn handler(
    change: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;

    let line = state
        .app
        .changes
        .withdraw_change(member, change.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(line.try_into()?))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use storefront::transition::TransitionError;
    use testresult::TestResult;

    use storefront_app::domain::{
        changes::{ChangesServiceError, MockChangesService, records::ChangeItemUuid},
        orders::records::{OrderDetailUuid, OrderUuid},
    };

    use crate::test_helpers::{TEST_MEMBER_UUID, make_detail};

    use super::{super::tests::changes_service, *};

    fn make_service(changes: MockChangesService) -> Service {
        changes_service(changes, Router::with_path("changes/{change}").delete(handler))
    }

    #[tokio::test]
    async fn test_withdraw_returns_ordered_line() -> TestResult {
        let uuid = ChangeItemUuid::new();
        let detail = make_detail(OrderDetailUuid::new(), OrderUuid::new());

        let mut changes = MockChangesService::new();

        changes
            .expect_withdraw_change()
            .once()
            .withf(move |member, change| *member == TEST_MEMBER_UUID && *change == uuid)
            .return_once(move |_, _| Ok(detail));

        let mut res = TestClient::delete(format!("http://example.com/changes/{uuid}"))
            .send(&make_service(changes))
            .await;

        let body: OrderDetailResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "ordered");

        Ok(())
    }

    #[tokio::test]
    async fn test_resolved_request_returns_409() {
        let mut changes = MockChangesService::new();

        changes.expect_withdraw_change().once().return_once(|_, _| {
            Err(ChangesServiceError::InvalidStateTransition(
                TransitionError::new("change request", "approved", "withdraw"),
            ))
        });

        let res = TestClient::delete(format!("http://example.com/changes/{}", Uuid::now_v7()))
            .send(&make_service(changes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }
}
