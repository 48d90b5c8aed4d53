//! Order Models

use crate::domain::orders::records::{OrderDetailRecord, OrderRecord, PaymentRecord};

/// An order line with the names needed to render it.
///
/// Names resolve through soft-deleted options too.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub detail: OrderDetailRecord,
    pub option_names: Vec<String>,
    pub combination_name: Option<String>,
}

/// An order with its lines and payment.
#[derive(Debug, Clone)]
pub struct Order {
    pub order: OrderRecord,
    pub lines: Vec<OrderLine>,
    pub payment: PaymentRecord,
}
