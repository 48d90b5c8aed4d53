//! Cart Models

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::carts::{models::Cart, records::CartLineRecord};

use crate::{catalog::models::SelectionBody, errors::line_total_error};

/// Cart Line Response
///
/// Prices are the snapshot taken when the line was added or last repriced.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub selection: SelectionBody,
    pub quantity: u32,
    pub base_price: u64,
    pub option_price: i64,
    pub unit_price: u64,
    pub line_total: u64,
    pub checked: bool,
    pub updated_at: String,
}

impl TryFrom<CartLineRecord> for CartLineResponse {
    type Error = StatusError;

    fn try_from(line: CartLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            uuid: line.uuid.into_uuid(),
            product_uuid: line.product_uuid.into_uuid(),
            selection: SelectionBody::from(&line.selection),
            quantity: line.quantity,
            base_price: line.base_price,
            option_price: line.option_price,
            unit_price: line.unit_price,
            line_total: line.line_total().ok_or_else(line_total_error)?,
            checked: line.checked,
            updated_at: line.updated_at.to_string(),
        })
    }
}

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    pub lines: Vec<CartLineResponse>,

    /// Number of checked lines
    pub checked_count: usize,

    /// Sum of checked line totals
    pub checked_subtotal: u64,
}

impl TryFrom<Cart> for CartResponse {
    type Error = StatusError;

    fn try_from(cart: Cart) -> Result<Self, Self::Error> {
        Ok(Self {
            checked_count: cart.checked_count(),
            checked_subtotal: cart.checked_subtotal().ok_or_else(line_total_error)?,
            lines: cart
                .lines
                .into_iter()
                .map(CartLineResponse::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}
