//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    catalog::Active,
    pricing::{PriceQuote, resolve_price},
    selection::OptionSelection,
};
use tracing::info;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        data::{NewOptionCombination, NewOptionType, NewOptionValue, NewProduct, ProductPriceUpdate},
        models::{OptionGroup, ProductOptions},
        records::{
            OptionCombinationRecord, OptionTypeRecord, OptionValueRecord, OptionValueUuid,
            ProductRecord, ProductUuid,
        },
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.create_product",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.repository.get_product(&mut tx, product).await?;

        tx.commit().await?;

        if record.deleted_at.is_some() {
            return Err(CatalogServiceError::NotFound);
        }

        Ok(record)
    }

    async fn get_options(&self, product: ProductUuid) -> Result<ProductOptions, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let snapshot = self
            .repository
            .load_snapshot(&mut tx, product, &OptionSelection::None)
            .await?;

        tx.commit().await?;

        let catalog = snapshot.to_catalog();

        if !catalog.product.is_active() {
            return Err(CatalogServiceError::NotFound);
        }

        let option_types = catalog
            .selectable_options()
            .into_iter()
            .filter_map(|option| {
                let option_type = snapshot
                    .option_types
                    .iter()
                    .find(|record| record.uuid.into_uuid() == option.option_type.uuid)?;

                let values = option
                    .values
                    .iter()
                    .filter_map(|value| {
                        snapshot
                            .option_values
                            .iter()
                            .find(|record| record.uuid.into_uuid() == value.uuid)
                            .cloned()
                    })
                    .collect();

                Some(OptionGroup {
                    option_type: option_type.clone(),
                    values,
                })
            })
            .collect();

        let combinations = snapshot
            .combinations
            .iter()
            .filter(|combination| combination.deleted_at.is_none())
            .cloned()
            .collect();

        Ok(ProductOptions {
            product: snapshot.product,
            option_types,
            combinations,
        })
    }

    async fn quote(
        &self,
        product: ProductUuid,
        selection: OptionSelection,
        quantity: u32,
    ) -> Result<PriceQuote, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let snapshot = self
            .repository
            .load_snapshot(&mut tx, product, &selection)
            .await?;

        tx.commit().await?;

        Ok(resolve_price(&snapshot.to_catalog(), &selection, quantity)?)
    }

    #[tracing::instrument(
        name = "catalog.service.update_product_price",
        skip(self, update),
        fields(product_uuid = %product),
        err
    )]
    async fn update_product_price(
        &self,
        product: ProductUuid,
        update: ProductPriceUpdate,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_product_price(&mut tx, product, update)
            .await?;

        tx.commit().await?;

        info!(product_uuid = %product, base_price = updated.base_price, "updated product price");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "catalog.service.delete_product",
        skip(self),
        fields(product_uuid = %product),
        err
    )]
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_product(&mut tx, product).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        self.repository
            .delete_product_options(&mut tx, product)
            .await?;

        let cart_lines = self
            .repository
            .delete_product_cart_lines(&mut tx, product)
            .await?;

        tx.commit().await?;

        info!(product_uuid = %product, cart_lines, "deleted product");

        Ok(())
    }

    async fn create_option_type(
        &self,
        option_type: NewOptionType,
    ) -> Result<OptionTypeRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self
            .repository
            .create_option_type(&mut tx, option_type)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_option_value(
        &self,
        value: NewOptionValue,
    ) -> Result<OptionValueRecord, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_option_value(&mut tx, value).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_option_combination(
        &self,
        combination: NewOptionCombination,
    ) -> Result<OptionCombinationRecord, CatalogServiceError> {
        if combination.value_uuids.is_empty() {
            return Err(CatalogServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let product = self
            .repository
            .get_product(&mut tx, combination.product_uuid)
            .await?;

        if product.deleted_at.is_some() {
            return Err(CatalogServiceError::NotFound);
        }

        let requested: Vec<_> = combination
            .value_uuids
            .iter()
            .map(|uuid| uuid.into_uuid())
            .collect();

        let values = self.repository.get_option_values(&mut tx, &requested).await?;

        for uuid in &requested {
            let value = values
                .iter()
                .find(|value| value.uuid.into_uuid() == *uuid)
                .ok_or(CatalogServiceError::InvalidReference)?;

            if value.product_uuid != combination.product_uuid {
                return Err(CatalogServiceError::AmbiguousOption(*uuid));
            }
        }

        let created = self
            .repository
            .create_option_combination(&mut tx, combination)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_option_value(&self, value: OptionValueUuid) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_option_value(&mut tx, value).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        self.repository.delete_value_combinations(&mut tx, value).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Creates a product.
    async fn create_product(&self, product: NewProduct) -> Result<ProductRecord, CatalogServiceError>;

    /// Retrieve a live product.
    async fn get_product(&self, product: ProductUuid) -> Result<ProductRecord, CatalogServiceError>;

    /// Live option types of a product with their live values, in display order.
    async fn get_options(&self, product: ProductUuid) -> Result<ProductOptions, CatalogServiceError>;

    /// Price a selection against the current catalog without writing anything.
    async fn quote(
        &self,
        product: ProductUuid,
        selection: OptionSelection,
        quantity: u32,
    ) -> Result<PriceQuote, CatalogServiceError>;

    /// Replace a product's prices. Existing cart lines keep their snapshot.
    async fn update_product_price(
        &self,
        product: ProductUuid,
        update: ProductPriceUpdate,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Soft-delete a product with its options, removing it from every cart.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), CatalogServiceError>;

    /// Creates an option type.
    async fn create_option_type(
        &self,
        option_type: NewOptionType,
    ) -> Result<OptionTypeRecord, CatalogServiceError>;

    /// Creates an option value.
    async fn create_option_value(
        &self,
        value: NewOptionValue,
    ) -> Result<OptionValueRecord, CatalogServiceError>;

    /// Creates a combination of values of the same product.
    async fn create_option_combination(
        &self,
        combination: NewOptionCombination,
    ) -> Result<OptionCombinationRecord, CatalogServiceError>;

    /// Soft-delete an option value.
    async fn delete_option_value(&self, value: OptionValueUuid) -> Result<(), CatalogServiceError>;
}
