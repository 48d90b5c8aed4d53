//! Order Records

use jiff::Timestamp;
use storefront::{
    orders::{DeliveryStatus, LineStatus, OrderNumber},
    payments::{PaymentMethod, PaymentStatus},
    selection::OptionSelection,
};

use crate::{
    domain::{catalog::records::ProductUuid, members::records::MemberUuid, orders::data::Recipient},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Detail UUID
pub type OrderDetailUuid = TypedUuid<OrderDetailRecord>;

/// Payment UUID
pub type PaymentUuid = TypedUuid<PaymentRecord>;

/// Order Record
///
/// The order header. Totals are fixed at checkout.
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub order_number: OrderNumber,
    pub member_uuid: MemberUuid,
    pub recipient: Recipient,
    pub total_price: u64,
    pub discount_price: u64,
    pub delivery_price: u64,
    pub mileage_used: u64,
    pub final_price: u64,
    pub delivery_status: DeliveryStatus,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub paid_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Detail Record
///
/// Immutable snapshot of one purchased line. Only `order_status` changes.
#[derive(Debug, Clone)]
pub struct OrderDetailRecord {
    pub uuid: OrderDetailUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub selection: OptionSelection,
    pub quantity: u32,
    pub base_price: u64,
    pub option_price: i64,
    pub unit_price: u64,
    pub order_status: LineStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderDetailRecord {
    /// Unit price times quantity, `None` if it does not fit.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

/// Payment Record
#[derive(Debug, Clone)]
pub struct PaymentRecord {
    pub uuid: PaymentUuid,
    pub order_uuid: OrderUuid,
    pub method: PaymentMethod,
    pub amount: u64,
    pub status: PaymentStatus,
    pub gateway_key: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
