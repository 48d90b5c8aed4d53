//! Cart Lines Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{pricing::PriceQuote, selection::OptionSelection};

use crate::{
    database::{
        amount_param, quantity_param, try_get_amount, try_get_quantity, try_get_selection,
    },
    domain::{
        carts::records::{CartLineRecord, CartLineUuid},
        catalog::records::ProductUuid,
        members::records::MemberUuid,
    },
};

const FIND_LINE_FOR_UPDATE_SQL: &str = include_str!("sql/find_line_for_update.sql");
const GET_LINE_FOR_UPDATE_SQL: &str = include_str!("sql/get_line_for_update.sql");
const CREATE_LINE_SQL: &str = include_str!("sql/create_line.sql");
const ADD_QUANTITY_SQL: &str = include_str!("sql/add_quantity.sql");
const SET_QUANTITY_SQL: &str = include_str!("sql/set_quantity.sql");
const TOGGLE_CHECKED_SQL: &str = include_str!("sql/toggle_checked.sql");
const SET_ALL_CHECKED_SQL: &str = include_str!("sql/set_all_checked.sql");
const UPDATE_LINE_PRICE_SQL: &str = include_str!("sql/update_line_price.sql");
const LIST_LINES_SQL: &str = include_str!("sql/list_lines.sql");
const DELETE_MATCHING_LINE_SQL: &str = include_str!("sql/delete_matching_line.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartLinesRepository;

impl PgCartLinesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Find and lock the member's line holding `product` with `selection`.
    pub(crate) async fn find_line_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        product: ProductUuid,
        selection: &OptionSelection,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(FIND_LINE_FOR_UPDATE_SQL)
            .bind(member.into_uuid())
            .bind(product.into_uuid())
            .bind(selection.values())
            .bind(selection.combination())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_line_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(GET_LINE_FOR_UPDATE_SQL)
            .bind(member.into_uuid())
            .bind(line.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a line, or merge into one a concurrent add created first.
    ///
    /// A merged line keeps its own price snapshot. Returns `None` when the
    /// merged quantity would not fit.
    pub(crate) async fn create_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        selection: &OptionSelection,
        quote: &PriceQuote,
    ) -> Result<Option<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(CREATE_LINE_SQL)
            .bind(CartLineUuid::new().into_uuid())
            .bind(member.into_uuid())
            .bind(quote.product_uuid)
            .bind(selection.values())
            .bind(selection.combination())
            .bind(quantity_param(quote.quantity)?)
            .bind(amount_param(quote.base_price, "base_price")?)
            .bind(quote.option_price)
            .bind(amount_param(quote.unit_price, "unit_price")?)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn add_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(ADD_QUANTITY_SQL)
            .bind(line.into_uuid())
            .bind(quantity_param(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(SET_QUANTITY_SQL)
            .bind(member.into_uuid())
            .bind(line.into_uuid())
            .bind(quantity_param(quantity)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn toggle_checked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(TOGGLE_CHECKED_SQL)
            .bind(member.into_uuid())
            .bind(line.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_all_checked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        checked: bool,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ALL_CHECKED_SQL)
            .bind(member.into_uuid())
            .bind(checked)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_line_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: CartLineUuid,
        quote: &PriceQuote,
    ) -> Result<CartLineRecord, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(UPDATE_LINE_PRICE_SQL)
            .bind(line.into_uuid())
            .bind(amount_param(quote.base_price, "base_price")?)
            .bind(quote.option_price)
            .bind(amount_param(quote.unit_price, "unit_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
    ) -> Result<Vec<CartLineRecord>, sqlx::Error> {
        query_as::<Postgres, CartLineRecord>(LIST_LINES_SQL)
            .bind(member.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Delete the member's line holding exactly `product` with `selection`.
    pub(crate) async fn delete_matching_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        product: ProductUuid,
        selection: &OptionSelection,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_MATCHING_LINE_SQL)
            .bind(member.into_uuid())
            .bind(product.into_uuid())
            .bind(selection.values())
            .bind(selection.combination())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLineRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartLineUuid::from_uuid(row.try_get("uuid")?),
            member_uuid: MemberUuid::from_uuid(row.try_get("member_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            selection: try_get_selection(row)?,
            quantity: try_get_quantity(row, "quantity")?,
            base_price: try_get_amount(row, "base_price")?,
            option_price: row.try_get("option_price")?,
            unit_price: try_get_amount(row, "unit_price")?,
            checked: row.try_get("checked")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
