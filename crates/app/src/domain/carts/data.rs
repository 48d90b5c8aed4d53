//! Cart Data

use storefront::selection::OptionSelection;

use crate::domain::catalog::records::ProductUuid;

/// New Cart Line Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub product_uuid: ProductUuid,
    pub selection: OptionSelection,
    pub quantity: u32,
}

/// Identifies a line by what it holds rather than by id.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineKey {
    pub product_uuid: ProductUuid,
    pub selection: OptionSelection,
}
