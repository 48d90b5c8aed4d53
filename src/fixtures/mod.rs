//! Fixtures
//!
//! Builders for catalog snapshots used by tests. Enabled by the `fixtures` feature.

use smallvec::SmallVec;
use thiserror::Error;
use uuid::Uuid;

use crate::catalog::{
    OptionCombination, OptionType, OptionValue, Product, ProductCatalog, StockStatus,
};

/// Fixture lookup errors
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FixtureError {
    /// Option type not found in the builder
    #[error("option type not found: {0}")]
    OptionTypeNotFound(Uuid),

    /// Option value not found in the builder
    #[error("option value not found: {0}")]
    OptionValueNotFound(Uuid),

    /// Combination not found in the builder
    #[error("option combination not found: {0}")]
    CombinationNotFound(Uuid),
}

/// Catalog Builder
///
/// Starts with an orderable, undiscounted product named "Product" and no
/// options. Every row added is live and in stock.
#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    catalog: ProductCatalog,
}

impl CatalogBuilder {
    /// Start a catalog for a product with the given list price.
    pub fn new(base_price: u64) -> Self {
        Self {
            catalog: ProductCatalog {
                product: Product {
                    uuid: Uuid::now_v7(),
                    name: "Product".to_string(),
                    base_price,
                    discount_price: None,
                    discount_per: None,
                    stock_status: StockStatus::Orderable,
                    available: true,
                    deleted: false,
                },
                option_types: Vec::new(),
                option_values: Vec::new(),
                combinations: Vec::new(),
            },
        }
    }

    /// Product identifier.
    pub fn product_uuid(&self) -> Uuid {
        self.catalog.product.uuid
    }

    /// Mutable access to the product.
    pub fn product_mut(&mut self) -> &mut Product {
        &mut self.catalog.product
    }

    /// Add an option type, returning its id.
    pub fn option_type(&mut self, name: &str, required: bool) -> Uuid {
        let uuid = Uuid::now_v7();
        let sort_order = i32::try_from(self.catalog.option_types.len()).unwrap_or(i32::MAX);

        self.catalog.option_types.push(OptionType {
            uuid,
            product_uuid: self.catalog.product.uuid,
            name: name.to_string(),
            required,
            sort_order,
            deleted: false,
        });

        uuid
    }

    /// Add a value to an option type, returning its id.
    pub fn option_value(&mut self, option_type_uuid: Uuid, name: &str, price_adjustment: i64) -> Uuid {
        let uuid = Uuid::now_v7();
        let sort_order = i32::try_from(self.catalog.option_values.len()).unwrap_or(i32::MAX);

        self.catalog.option_values.push(OptionValue {
            uuid,
            option_type_uuid,
            product_uuid: self.catalog.product.uuid,
            name: name.to_string(),
            price_adjustment,
            sort_order,
            in_stock: true,
            deleted: false,
        });

        uuid
    }

    /// Add a combination of existing values, returning its id.
    pub fn combination(&mut self, name: &str, values: impl IntoIterator<Item = Uuid>) -> Uuid {
        let uuid = Uuid::now_v7();

        self.catalog.combinations.push(OptionCombination {
            uuid,
            product_uuid: self.catalog.product.uuid,
            name: name.to_string(),
            value_uuids: values.into_iter().collect::<SmallVec<_>>(),
            in_stock: true,
            deleted: false,
        });

        uuid
    }

    /// Mutable access to an option type.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::OptionTypeNotFound`] for an unknown id.
    pub fn option_type_mut(&mut self, uuid: Uuid) -> Result<&mut OptionType, FixtureError> {
        self.catalog
            .option_types
            .iter_mut()
            .find(|option| option.uuid == uuid)
            .ok_or(FixtureError::OptionTypeNotFound(uuid))
    }

    /// Mutable access to an option value.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::OptionValueNotFound`] for an unknown id.
    pub fn option_value_mut(&mut self, uuid: Uuid) -> Result<&mut OptionValue, FixtureError> {
        self.catalog
            .option_values
            .iter_mut()
            .find(|value| value.uuid == uuid)
            .ok_or(FixtureError::OptionValueNotFound(uuid))
    }

    /// Mutable access to a combination.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::CombinationNotFound`] for an unknown id.
    pub fn combination_mut(&mut self, uuid: Uuid) -> Result<&mut OptionCombination, FixtureError> {
        self.catalog
            .combinations
            .iter_mut()
            .find(|combination| combination.uuid == uuid)
            .ok_or(FixtureError::CombinationNotFound(uuid))
    }

    /// Finish the snapshot.
    pub fn build(self) -> ProductCatalog {
        self.catalog
    }
}
