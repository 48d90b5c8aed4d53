//! Order Models

use std::string::ToString;

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::{
    data::Recipient,
    models::{Order, OrderLine},
    records::{OrderRecord, PaymentRecord},
};

use crate::{catalog::models::SelectionBody, errors::line_total_error};

/// Recipient Body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct RecipientBody {
    pub name: String,
    pub phone: String,
    pub postal_code: String,
    pub address: String,
    pub address_detail: String,
    #[serde(default)]
    pub delivery_message: Option<String>,
}

impl From<RecipientBody> for Recipient {
    fn from(body: RecipientBody) -> Self {
        Self {
            name: body.name,
            phone: body.phone,
            postal_code: body.postal_code,
            address: body.address,
            address_detail: body.address_detail,
            delivery_message: body.delivery_message,
        }
    }
}

impl From<Recipient> for RecipientBody {
    fn from(recipient: Recipient) -> Self {
        Self {
            name: recipient.name,
            phone: recipient.phone,
            postal_code: recipient.postal_code,
            address: recipient.address,
            address_detail: recipient.address_detail,
            delivery_message: recipient.delivery_message,
        }
    }
}

/// Order Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub uuid: Uuid,
    pub order_number: String,
    pub recipient: RecipientBody,
    pub total_price: u64,
    pub discount_price: u64,
    pub delivery_price: u64,
    pub mileage_used: u64,
    pub final_price: u64,

    /// One of `payment_pending`, `payment_completed`, `preparing`,
    /// `shipping`, `delivered`, `order_canceled`
    pub delivery_status: String,

    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub paid_at: Option<String>,
    pub created_at: String,
}

impl From<OrderRecord> for OrderSummaryResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            order_number: order.order_number.into_string(),
            recipient: order.recipient.into(),
            total_price: order.total_price,
            discount_price: order.discount_price,
            delivery_price: order.delivery_price,
            mileage_used: order.mileage_used,
            final_price: order.final_price,
            delivery_status: order.delivery_status.as_str().to_string(),
            carrier: order.carrier,
            tracking_number: order.tracking_number,
            paid_at: order.paid_at.as_ref().map(ToString::to_string),
            created_at: order.created_at.to_string(),
        }
    }
}

/// Order Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub product_name: String,
    pub selection: SelectionBody,

    /// Names of the selected option values, deleted ones included
    pub option_names: Vec<String>,

    pub combination_name: Option<String>,
    pub quantity: u32,
    pub base_price: u64,
    pub option_price: i64,
    pub unit_price: u64,
    pub line_total: u64,

    /// One of `ordered`, `canceled`, `exchange_requested`, `return_requested`
    pub status: String,
}

impl TryFrom<OrderLine> for OrderLineResponse {
    type Error = StatusError;

    fn try_from(line: OrderLine) -> Result<Self, Self::Error> {
        let detail = line.detail;

        Ok(Self {
            uuid: detail.uuid.into_uuid(),
            product_uuid: detail.product_uuid.into_uuid(),
            line_total: detail.line_total().ok_or_else(line_total_error)?,
            selection: SelectionBody::from(&detail.selection),
            product_name: detail.product_name,
            option_names: line.option_names,
            combination_name: line.combination_name,
            quantity: detail.quantity,
            base_price: detail.base_price,
            option_price: detail.option_price,
            unit_price: detail.unit_price,
            status: detail.order_status.as_str().to_string(),
        })
    }
}

/// Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    pub uuid: Uuid,
    pub method: String,
    pub amount: u64,
    pub status: String,
    pub gateway_key: Option<String>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        Self {
            uuid: payment.uuid.into_uuid(),
            method: payment.method.as_str().to_string(),
            amount: payment.amount,
            status: payment.status.as_str().to_string(),
            gateway_key: payment.gateway_key,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub order: OrderSummaryResponse,
    pub lines: Vec<OrderLineResponse>,
    pub payment: PaymentResponse,
}

impl TryFrom<Order> for OrderResponse {
    type Error = StatusError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(Self {
            order: order.order.into(),
            lines: order
                .lines
                .into_iter()
                .map(OrderLineResponse::try_from)
                .collect::<Result<_, _>>()?,
            payment: order.payment.into(),
        })
    }
}
