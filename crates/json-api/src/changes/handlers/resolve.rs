//! Resolve Change Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::changes::Decision;
use uuid::Uuid;

use crate::{
    changes::{errors::into_status_error, models::ChangeResolutionResponse},
    errors::{ErrorKind, kind_error},
    extensions::*,
    observability::record_change_resolution,
    state::State,
};

/// Resolve Change Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ResolveChangeRequest {
    /// `approve` or `reject`
    pub decision: String,
}

fn parse_decision(decision: &str) -> Result<Decision, StatusError> {
    match decision {
        "approve" => Ok(Decision::Approve),
        "reject" => Ok(Decision::Reject),
        other => Err(kind_error(
            ErrorKind::Validation,
            format!("unknown decision: {other}"),
        )),
    }
}

const fn decision_label(decision: Decision) -> &'static str {
    match decision {
        Decision::Approve => "approve",
        Decision::Reject => "reject",
    }
}

/// Resolve Change Handler
///
/// Approves or rejects a pending request. An approved return cancels the
/// line, and the order too once no live line is left.
#[endpoint(
    tags("admin"),
    summary = "Resolve Change Request",
    responses(
        (status_code = StatusCode::OK, description = "Request resolved"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown decision"),
        (status_code = StatusCode::NOT_FOUND, description = "Request not found"),
        (status_code = StatusCode::CONFLICT, description = "Request already resolved"),
    ),
)]
#[tracing::instrument(
    name = "changes.resolve",
    skip(change, json, depot),
    fields(change_uuid = tracing::field::Empty, decision = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    change: PathParam<Uuid>,
    json: JsonBody<ResolveChangeRequest>,
    depot: &mut Depot,
) -> Result<Json<ChangeResolutionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let change = change.into_inner();
    let decision = parse_decision(&json.into_inner().decision)?;

    let span = tracing::Span::current();

    span.record("change_uuid", tracing::field::display(change));
    span.record("decision", decision_label(decision));

    let resolution = state
        .app
        .changes
        .resolve_change(change.into(), decision)
        .await
        .map_err(into_status_error)?;

    record_change_resolution(decision_label(decision), resolution.order_canceled);

    if resolution.order_canceled {
        tracing::info!(%change, "approved return cancelled the whole order");
    }

    Ok(Json(resolution.try_into()?))
}
