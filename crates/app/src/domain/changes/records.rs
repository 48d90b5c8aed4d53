//! Change Records

use jiff::Timestamp;
use storefront::changes::{ApprovalStatus, ChangeKind};

use crate::{domain::orders::records::OrderDetailUuid, uuids::TypedUuid};

/// Change Item UUID
pub type ChangeItemUuid = TypedUuid<ChangeItemRecord>;

/// Change Item Record
///
/// One exchange or return request against an order line.
#[derive(Debug, Clone)]
pub struct ChangeItemRecord {
    pub uuid: ChangeItemUuid,
    pub order_detail_uuid: OrderDetailUuid,
    pub kind: ChangeKind,
    pub reason: String,
    pub approval_status: ApprovalStatus,
    pub resolved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
