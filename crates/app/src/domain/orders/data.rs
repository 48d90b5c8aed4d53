//! Order Data

use storefront::{
    orders::{DeclaredTotals, DeliveryStatus},
    payments::{PaymentMethod, PaymentOutcome},
    selection::OptionSelection,
};

use crate::domain::{catalog::records::ProductUuid, orders::records::OrderUuid};

/// Where an order ships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub phone: String,
    pub postal_code: String,
    pub address: String,
    pub address_detail: String,
    pub delivery_message: Option<String>,
}

impl Recipient {
    /// Name of the first blank required field.
    pub(crate) fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("recipient_name", &self.name),
            ("recipient_phone", &self.phone),
            ("postal_code", &self.postal_code),
            ("address", &self.address),
            ("address_detail", &self.address_detail),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// One requested order line with the prices the client saw.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub product_uuid: ProductUuid,
    pub selection: OptionSelection,
    pub quantity: u32,
    pub declared_base_price: u64,
    pub declared_option_price: i64,
}

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub recipient: Recipient,
    pub lines: Vec<NewOrderLine>,
    pub payment_method: PaymentMethod,
    pub declared: DeclaredTotals,
    pub mileage: u64,
}

/// Admin delivery change for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryUpdate {
    pub order_uuid: OrderUuid,
    pub delivery_status: DeliveryStatus,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
}

/// Gateway verdict on an order's payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub gateway_key: String,
    pub outcome: PaymentOutcome,
    pub amount: u64,
}
