//! Catalog Records

use jiff::Timestamp;
use storefront::catalog::{OptionCombination, OptionType, OptionValue, Product, StockStatus};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Option Type UUID
pub type OptionTypeUuid = TypedUuid<OptionTypeRecord>;

/// Option Value UUID
pub type OptionValueUuid = TypedUuid<OptionValueRecord>;

/// Option Combination UUID
pub type OptionCombinationUuid = TypedUuid<OptionCombinationRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub base_price: u64,
    pub discount_price: Option<u64>,
    pub discount_per: Option<u32>,
    pub stock_status: StockStatus,
    pub available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Option Type Record
#[derive(Debug, Clone)]
pub struct OptionTypeRecord {
    pub uuid: OptionTypeUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub required: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Option Value Record
#[derive(Debug, Clone)]
pub struct OptionValueRecord {
    pub uuid: OptionValueUuid,
    pub option_type_uuid: OptionTypeUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub price_adjustment: i64,
    pub sort_order: i32,
    pub in_stock: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Option Combination Record
#[derive(Debug, Clone)]
pub struct OptionCombinationRecord {
    pub uuid: OptionCombinationUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub value_uuids: Vec<OptionValueUuid>,
    pub in_stock: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl From<&ProductRecord> for Product {
    fn from(record: &ProductRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            name: record.name.clone(),
            base_price: record.base_price,
            discount_price: record.discount_price,
            discount_per: record.discount_per,
            stock_status: record.stock_status,
            available: record.available,
            deleted: record.deleted_at.is_some(),
        }
    }
}

impl From<&OptionTypeRecord> for OptionType {
    fn from(record: &OptionTypeRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            product_uuid: record.product_uuid.into_uuid(),
            name: record.name.clone(),
            required: record.required,
            sort_order: record.sort_order,
            deleted: record.deleted_at.is_some(),
        }
    }
}

impl From<&OptionValueRecord> for OptionValue {
    fn from(record: &OptionValueRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            option_type_uuid: record.option_type_uuid.into_uuid(),
            product_uuid: record.product_uuid.into_uuid(),
            name: record.name.clone(),
            price_adjustment: record.price_adjustment,
            sort_order: record.sort_order,
            in_stock: record.in_stock,
            deleted: record.deleted_at.is_some(),
        }
    }
}

impl From<&OptionCombinationRecord> for OptionCombination {
    fn from(record: &OptionCombinationRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            product_uuid: record.product_uuid.into_uuid(),
            name: record.name.clone(),
            value_uuids: record
                .value_uuids
                .iter()
                .map(|uuid| uuid.into_uuid())
                .collect(),
            in_stock: record.in_stock,
            deleted: record.deleted_at.is_some(),
        }
    }
}
