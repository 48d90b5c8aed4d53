//! Catalog Models

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use storefront::{
    catalog::StockStatus,
    pricing::PriceQuote,
    selection::OptionSelection,
};
use uuid::Uuid;

use crate::errors::selection_error;

/// Chosen options: individual values, or one pre-built combination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct SelectionBody {
    /// Selected option value ids
    #[serde(default)]
    pub option_values: Vec<Uuid>,

    /// Selected combination id
    #[serde(default)]
    pub combination: Option<Uuid>,
}

impl SelectionBody {
    pub(crate) fn into_selection(self) -> Result<OptionSelection, StatusError> {
        OptionSelection::from_parts(self.option_values, self.combination)
            .map_err(|source| selection_error(&source))
    }
}

impl From<&OptionSelection> for SelectionBody {
    fn from(selection: &OptionSelection) -> Self {
        Self {
            option_values: selection.values().to_vec(),
            combination: selection.combination(),
        }
    }
}

pub(crate) fn stock_status_name(status: StockStatus) -> &'static str {
    match status {
        StockStatus::OutOfStock => "out_of_stock",
        StockStatus::Orderable => "orderable",
        StockStatus::PartiallyOrderable => "partially_orderable",
    }
}

/// Price Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteResponse {
    pub product_uuid: Uuid,

    /// Product list price
    pub list_price: u64,

    /// Effective base price after product discounts
    pub base_price: u64,

    /// Sum of option adjustments, may be negative
    pub option_price: i64,

    pub list_unit_price: u64,
    pub unit_price: u64,
    pub quantity: u32,
    pub list_total: u64,
    pub line_total: u64,

    /// Product discount across the line
    pub discount_total: u64,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            product_uuid: quote.product_uuid,
            list_price: quote.list_price,
            base_price: quote.base_price,
            option_price: quote.option_price,
            list_unit_price: quote.list_unit_price,
            unit_price: quote.unit_price,
            quantity: quote.quantity,
            list_total: quote.list_total,
            line_total: quote.line_total,
            discount_total: quote.discount_total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_and_combination_cannot_be_mixed() {
        let body = SelectionBody {
            option_values: vec![Uuid::now_v7()],
            combination: Some(Uuid::now_v7()),
        };

        let result = body.into_selection();

        assert!(
            result.as_ref().is_err_and(|error| error.detail.as_deref() == Some("validation_error")),
            "expected validation error, got {result:?}"
        );
    }

    #[test]
    fn empty_body_is_no_selection() {
        let result = SelectionBody::default().into_selection();

        assert_eq!(result.ok(), Some(OptionSelection::None));
    }
}
