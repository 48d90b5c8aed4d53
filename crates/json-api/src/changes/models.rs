//! Change Request Models

use std::string::ToString;

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    changes::{
        models::{ChangeRequest, ChangeResolution},
        records::ChangeItemRecord,
    },
    orders::records::OrderDetailRecord,
};

use crate::{catalog::models::SelectionBody, errors::line_total_error};

/// Change Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeResponse {
    pub uuid: Uuid,
    pub order_detail_uuid: Uuid,

    /// `exchange` or `return`
    pub kind: String,

    pub reason: String,

    /// One of `pending`, `approved`, `rejected`
    pub approval_status: String,

    pub resolved_at: Option<String>,
    pub created_at: String,
}

impl From<ChangeItemRecord> for ChangeResponse {
    fn from(change: ChangeItemRecord) -> Self {
        Self {
            uuid: change.uuid.into_uuid(),
            order_detail_uuid: change.order_detail_uuid.into_uuid(),
            kind: change.kind.as_str().to_string(),
            reason: change.reason,
            approval_status: change.approval_status.as_str().to_string(),
            resolved_at: change.resolved_at.as_ref().map(ToString::to_string),
            created_at: change.created_at.to_string(),
        }
    }
}

/// Change Request Response
///
/// A request together with the order line it targets.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeRequestResponse {
    pub change: ChangeResponse,
    pub order_uuid: Uuid,
    pub order_number: String,
    pub member_uuid: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub line_status: String,
}

impl From<ChangeRequest> for ChangeRequestResponse {
    fn from(request: ChangeRequest) -> Self {
        Self {
            change: request.change.into(),
            order_uuid: request.order_uuid.into_uuid(),
            order_number: request.order_number.into_string(),
            member_uuid: request.member_uuid.into_uuid(),
            product_name: request.product_name,
            quantity: request.quantity,
            line_status: request.line_status.as_str().to_string(),
        }
    }
}

/// Order Detail Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailResponse {
    pub uuid: Uuid,
    pub order_uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub selection: SelectionBody,
    pub quantity: u32,
    pub unit_price: u64,
    pub line_total: u64,

    /// One of `ordered`, `canceled`, `exchange_requested`, `return_requested`
    pub status: String,
}

impl TryFrom<OrderDetailRecord> for OrderDetailResponse {
    type Error = StatusError;

    fn try_from(detail: OrderDetailRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: detail.uuid.into_uuid(),
            order_uuid: detail.order_uuid.into_uuid(),
            product_uuid: detail.product_uuid.into_uuid(),
            line_total: detail.line_total().ok_or_else(line_total_error)?,
            selection: SelectionBody::from(&detail.selection),
            product_name: detail.product_name,
            quantity: detail.quantity,
            unit_price: detail.unit_price,
            status: detail.order_status.as_str().to_string(),
        })
    }
}

/// Change Resolution Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChangeResolutionResponse {
    pub change: ChangeResponse,
    pub line: OrderDetailResponse,

    /// Order delivery status after the decision
    pub delivery_status: String,

    /// Whether the decision cancelled the whole order
    pub order_canceled: bool,
}

impl TryFrom<ChangeResolution> for ChangeResolutionResponse {
    type Error = StatusError;

    fn try_from(resolution: ChangeResolution) -> Result<Self, Self::Error> {
        Ok(Self {
            change: resolution.change.into(),
            line: resolution.line.try_into()?,
            delivery_status: resolution.delivery_status.as_str().to_string(),
            order_canceled: resolution.order_canceled,
        })
    }
}
