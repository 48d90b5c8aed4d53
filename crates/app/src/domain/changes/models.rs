//! Change Models

use storefront::orders::{DeliveryStatus, LineStatus, OrderNumber};

use crate::domain::{
    changes::records::ChangeItemRecord,
    members::records::MemberUuid,
    orders::records::{OrderDetailRecord, OrderUuid},
};

/// A change request with the order line it targets.
#[derive(Debug, Clone)]
pub struct ChangeRequest {
    pub change: ChangeItemRecord,
    pub order_uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub member_uuid: MemberUuid,
    pub product_name: String,
    pub quantity: u32,
    pub line_status: LineStatus,
}

/// Outcome of an admin decision.
#[derive(Debug, Clone)]
pub struct ChangeResolution {
    pub change: ChangeItemRecord,
    pub line: OrderDetailRecord,
    pub delivery_status: DeliveryStatus,

    /// Whether this decision cancelled the whole order.
    pub order_canceled: bool,
}
