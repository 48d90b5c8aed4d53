//! Catalog Data

use storefront::catalog::StockStatus;

use crate::domain::catalog::records::{
    OptionCombinationUuid, OptionTypeUuid, OptionValueUuid, ProductUuid,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub base_price: u64,
    pub discount_price: Option<u64>,
    pub discount_per: Option<u32>,
    pub stock_status: StockStatus,
    pub available: bool,
}

/// Product Price Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPriceUpdate {
    pub base_price: u64,
    pub discount_price: Option<u64>,
    pub discount_per: Option<u32>,
}

/// New Option Type Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOptionType {
    pub uuid: OptionTypeUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub required: bool,
    pub sort_order: i32,
}

/// New Option Value Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOptionValue {
    pub uuid: OptionValueUuid,
    pub option_type_uuid: OptionTypeUuid,
    pub name: String,
    pub price_adjustment: i64,
    pub sort_order: i32,
    pub in_stock: bool,
}

/// New Option Combination Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOptionCombination {
    pub uuid: OptionCombinationUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub value_uuids: Vec<OptionValueUuid>,
    pub in_stock: bool,
}
