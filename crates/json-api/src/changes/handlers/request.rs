//! Request Change Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use storefront::changes::ChangeKind;
use uuid::Uuid;

use storefront_app::domain::changes::{data::NewChangeRequest, records::ChangeItemUuid};

use crate::{
    changes::{errors::into_status_error, models::ChangeResponse},
    errors::{ErrorKind, kind_error},
    extensions::*,
    state::State,
};

/// Request Change Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RequestChangeRequest {
    #[serde(default)]
    pub uuid: Option<Uuid>,

    pub order_detail_uuid: Uuid,

    /// `exchange` or `return`
    pub kind: String,

    pub reason: String,
}

impl TryFrom<RequestChangeRequest> for NewChangeRequest {
    type Error = StatusError;

    fn try_from(body: RequestChangeRequest) -> Result<Self, Self::Error> {
        let kind = body
            .kind
            .parse::<ChangeKind>()
            .map_err(|source| kind_error(ErrorKind::Validation, source.to_string()))?;

        Ok(Self {
            uuid: body.uuid.map_or_else(ChangeItemUuid::new, ChangeItemUuid::from_uuid),
            order_detail_uuid: body.order_detail_uuid.into(),
            kind,
            reason: body.reason,
        })
    }
}

/// Request Change Handler
///
/// Opens an exchange or return request against one of the member's order
/// lines. Only `ordered` lines accept a request.
#[endpoint(
    tags("changes"),
    summary = "Request Exchange or Return",
    responses(
        (status_code = StatusCode::CREATED, description = "Change requested"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::FORBIDDEN, description = "Line belongs to another member"),
        (status_code = StatusCode::NOT_FOUND, description = "Line not found"),
        (status_code = StatusCode::CONFLICT, description = "Line already has an open request"),
    ),
)]
#[tracing::instrument(
    name = "changes.request",
    skip(json, depot, res),
    fields(change_uuid = tracing::field::Empty, kind = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<RequestChangeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ChangeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let member = depot.member_uuid_or_401()?;
    let request = NewChangeRequest::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("change_uuid", tracing::field::display(request.uuid));
    span.record("kind", request.kind.as_str());

    let change = state
        .app
        .changes
        .request_change(member, request)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/changes/{}", change.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(change.into()))
}
