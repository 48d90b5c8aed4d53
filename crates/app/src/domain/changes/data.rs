//! Change Data

use storefront::changes::ChangeKind;

use crate::domain::{changes::records::ChangeItemUuid, orders::records::OrderDetailUuid};

/// New Change Request Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewChangeRequest {
    pub uuid: ChangeItemUuid,
    pub order_detail_uuid: OrderDetailUuid,
    pub kind: ChangeKind,
    pub reason: String,
}
