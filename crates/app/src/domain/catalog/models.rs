//! Catalog Models

use storefront::catalog::{OptionCombination, OptionType, OptionValue, Product, ProductCatalog};

use crate::domain::catalog::records::{
    OptionCombinationRecord, OptionTypeRecord, OptionValueRecord, ProductRecord,
};

/// A product with its selectable options, in display order.
#[derive(Debug, Clone)]
pub struct ProductOptions {
    pub product: ProductRecord,
    pub option_types: Vec<OptionGroup>,
    pub combinations: Vec<OptionCombinationRecord>,
}

/// An option type with its live values.
#[derive(Debug, Clone)]
pub struct OptionGroup {
    pub option_type: OptionTypeRecord,
    pub values: Vec<OptionValueRecord>,
}

/// Every row needed to validate and price a selection for one product,
/// soft-deleted rows included.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub product: ProductRecord,
    pub option_types: Vec<OptionTypeRecord>,
    pub option_values: Vec<OptionValueRecord>,
    pub combinations: Vec<OptionCombinationRecord>,
}

impl CatalogSnapshot {
    /// Pure catalog view for pricing and availability checks.
    pub fn to_catalog(&self) -> ProductCatalog {
        ProductCatalog {
            product: Product::from(&self.product),
            option_types: self.option_types.iter().map(OptionType::from).collect(),
            option_values: self.option_values.iter().map(OptionValue::from).collect(),
            combinations: self
                .combinations
                .iter()
                .map(OptionCombination::from)
                .collect(),
        }
    }
}
