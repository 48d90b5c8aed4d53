//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{catalog::StockStatus, selection::OptionSelection};
use uuid::Uuid;

use crate::{
    database::{amount_param, try_get_amount, try_get_code},
    domain::catalog::{
        data::{NewOptionCombination, NewOptionType, NewOptionValue, NewProduct, ProductPriceUpdate},
        models::CatalogSnapshot,
        records::{
            OptionCombinationRecord, OptionCombinationUuid, OptionTypeRecord, OptionTypeUuid,
            OptionValueRecord, OptionValueUuid, ProductRecord, ProductUuid,
        },
    },
};

const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const UPDATE_PRODUCT_PRICE_SQL: &str = include_str!("sql/update_product_price.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const DELETE_PRODUCT_OPTIONS_SQL: &str = include_str!("sql/delete_product_options.sql");
const DELETE_PRODUCT_CART_LINES_SQL: &str = include_str!("sql/delete_product_cart_lines.sql");
const CREATE_OPTION_TYPE_SQL: &str = include_str!("sql/create_option_type.sql");
const LIST_OPTION_TYPES_SQL: &str = include_str!("sql/list_option_types.sql");
const CREATE_OPTION_VALUE_SQL: &str = include_str!("sql/create_option_value.sql");
const LIST_OPTION_VALUES_SQL: &str = include_str!("sql/list_option_values.sql");
const GET_OPTION_VALUES_SQL: &str = include_str!("sql/get_option_values.sql");
const DELETE_OPTION_VALUE_SQL: &str = include_str!("sql/delete_option_value.sql");
const DELETE_VALUE_COMBINATIONS_SQL: &str = include_str!("sql/delete_value_combinations.sql");
const CREATE_OPTION_COMBINATION_SQL: &str = include_str!("sql/create_option_combination.sql");
const CREATE_OPTION_COMBINATION_VALUES_SQL: &str =
    include_str!("sql/create_option_combination_values.sql");
const LIST_OPTION_COMBINATIONS_SQL: &str = include_str!("sql/list_option_combinations.sql");
const GET_OPTION_COMBINATIONS_SQL: &str = include_str!("sql/get_option_combinations.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let discount_price = product
            .discount_price
            .map(|price| amount_param(price, "discount_price"))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.name)
            .bind(amount_param(product.base_price, "base_price")?)
            .bind(discount_price)
            .bind(percentage_param(product.discount_per)?)
            .bind(product.stock_status.code())
            .bind(product.available)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductPriceUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let discount_price = update
            .discount_price
            .map(|price| amount_param(price, "discount_price"))
            .transpose()?;

        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_PRICE_SQL)
            .bind(product.into_uuid())
            .bind(amount_param(update.base_price, "base_price")?)
            .bind(discount_price)
            .bind(percentage_param(update.discount_per)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_product_options(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<(), sqlx::Error> {
        query(DELETE_PRODUCT_OPTIONS_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_product_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_CART_LINES_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_option_type(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        option_type: NewOptionType,
    ) -> Result<OptionTypeRecord, sqlx::Error> {
        query_as::<Postgres, OptionTypeRecord>(CREATE_OPTION_TYPE_SQL)
            .bind(option_type.uuid.into_uuid())
            .bind(option_type.product_uuid.into_uuid())
            .bind(option_type.name)
            .bind(option_type.required)
            .bind(option_type.sort_order)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_option_types(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<OptionTypeRecord>, sqlx::Error> {
        query_as::<Postgres, OptionTypeRecord>(LIST_OPTION_TYPES_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_option_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        value: NewOptionValue,
    ) -> Result<OptionValueRecord, sqlx::Error> {
        query_as::<Postgres, OptionValueRecord>(CREATE_OPTION_VALUE_SQL)
            .bind(value.uuid.into_uuid())
            .bind(value.option_type_uuid.into_uuid())
            .bind(value.name)
            .bind(value.price_adjustment)
            .bind(value.sort_order)
            .bind(value.in_stock)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_option_values(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<OptionValueRecord>, sqlx::Error> {
        query_as::<Postgres, OptionValueRecord>(LIST_OPTION_VALUES_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_option_values(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        values: &[Uuid],
    ) -> Result<Vec<OptionValueRecord>, sqlx::Error> {
        query_as::<Postgres, OptionValueRecord>(GET_OPTION_VALUES_SQL)
            .bind(values)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn delete_option_value(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        value: OptionValueUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_OPTION_VALUE_SQL)
            .bind(value.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_value_combinations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        value: OptionValueUuid,
    ) -> Result<(), sqlx::Error> {
        query(DELETE_VALUE_COMBINATIONS_SQL)
            .bind(value.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_option_combination(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        combination: NewOptionCombination,
    ) -> Result<OptionCombinationRecord, sqlx::Error> {
        let mut created = query_as::<Postgres, OptionCombinationRecord>(CREATE_OPTION_COMBINATION_SQL)
            .bind(combination.uuid.into_uuid())
            .bind(combination.product_uuid.into_uuid())
            .bind(combination.name)
            .bind(combination.in_stock)
            .fetch_one(&mut **tx)
            .await?;

        let values: Vec<Uuid> = combination
            .value_uuids
            .iter()
            .map(|uuid| uuid.into_uuid())
            .collect();

        query(CREATE_OPTION_COMBINATION_VALUES_SQL)
            .bind(created.uuid.into_uuid())
            .bind(&values)
            .execute(&mut **tx)
            .await?;

        created.value_uuids = combination.value_uuids;

        Ok(created)
    }

    pub(crate) async fn list_option_combinations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Vec<OptionCombinationRecord>, sqlx::Error> {
        query_as::<Postgres, OptionCombinationRecord>(LIST_OPTION_COMBINATIONS_SQL)
            .bind(product.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_option_combinations(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        combinations: &[Uuid],
    ) -> Result<Vec<OptionCombinationRecord>, sqlx::Error> {
        query_as::<Postgres, OptionCombinationRecord>(GET_OPTION_COMBINATIONS_SQL)
            .bind(combinations)
            .fetch_all(&mut **tx)
            .await
    }

    /// Load everything needed to price `selection` for `product`.
    ///
    /// Selected values and combinations owned by another product are loaded
    /// too, so pricing can reject them instead of reporting them missing.
    pub(crate) async fn load_snapshot(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        selection: &OptionSelection,
    ) -> Result<CatalogSnapshot, sqlx::Error> {
        let product_record = self.get_product(tx, product).await?;
        let option_types = self.list_option_types(tx, product).await?;
        let mut option_values = self.list_option_values(tx, product).await?;
        let mut combinations = self.list_option_combinations(tx, product).await?;

        let mut foreign_values: Vec<Uuid> = selection
            .values()
            .iter()
            .copied()
            .filter(|uuid| !option_values.iter().any(|value| value.uuid.into_uuid() == *uuid))
            .collect();

        if let Some(combination) = selection.combination()
            && !combinations
                .iter()
                .any(|candidate| candidate.uuid.into_uuid() == combination)
        {
            let foreign = self.get_option_combinations(tx, &[combination]).await?;

            for record in &foreign {
                foreign_values.extend(record.value_uuids.iter().map(|uuid| uuid.into_uuid()));
            }

            combinations.extend(foreign);
        }

        if !foreign_values.is_empty() {
            option_values.extend(self.get_option_values(tx, &foreign_values).await?);
        }

        Ok(CatalogSnapshot {
            product: product_record,
            option_types,
            option_values,
            combinations,
        })
    }
}

fn percentage_param(percentage: Option<u32>) -> sqlx::Result<Option<i32>> {
    percentage
        .map(|per| {
            i32::try_from(per)
                .map_err(|e| sqlx::Error::Encode(format!("discount_per: {e}").into()))
        })
        .transpose()
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_price = row
            .try_get::<Option<i64>, _>("discount_price")?
            .map(u64::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_price".to_string(),
                source: Box::new(e),
            })?;

        let discount_per = row
            .try_get::<Option<i32>, _>("discount_per")?
            .map(u32::try_from)
            .transpose()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "discount_per".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            base_price: try_get_amount(row, "base_price")?,
            discount_price,
            discount_per,
            stock_status: try_get_code(row, "stock_status", StockStatus::from_code)?,
            available: row.try_get("available")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OptionTypeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OptionTypeUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            required: row.try_get("required")?,
            sort_order: row.try_get("sort_order")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OptionValueRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OptionValueUuid::from_uuid(row.try_get("uuid")?),
            option_type_uuid: OptionTypeUuid::from_uuid(row.try_get("option_type_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            price_adjustment: row.try_get("price_adjustment")?,
            sort_order: row.try_get("sort_order")?,
            in_stock: row.try_get("in_stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OptionCombinationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let value_uuids: Vec<Uuid> = row.try_get("value_uuids")?;

        Ok(Self {
            uuid: OptionCombinationUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            value_uuids: value_uuids
                .into_iter()
                .map(OptionValueUuid::from_uuid)
                .collect(),
            in_stock: row.try_get("in_stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
