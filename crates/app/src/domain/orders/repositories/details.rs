//! Order Details Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{orders::LineStatus, pricing::PriceQuote, selection::OptionSelection};

use crate::{
    database::{
        amount_param, quantity_param, try_get_amount, try_get_code, try_get_quantity,
        try_get_selection,
    },
    domain::{
        catalog::records::ProductUuid,
        orders::{
            models::OrderLine,
            records::{OrderDetailRecord, OrderDetailUuid, OrderUuid},
        },
    },
};

const CREATE_DETAIL_SQL: &str = include_str!("../sql/create_detail.sql");
const GET_DETAIL_SQL: &str = include_str!("../sql/get_detail.sql");
const GET_DETAIL_FOR_UPDATE_SQL: &str = include_str!("../sql/get_detail_for_update.sql");
const LIST_DETAILS_FOR_UPDATE_SQL: &str = include_str!("../sql/list_details_for_update.sql");
const SET_DETAIL_STATUS_SQL: &str = include_str!("../sql/set_detail_status.sql");
const CANCEL_DETAILS_SQL: &str = include_str!("../sql/cancel_details.sql");
const LIST_ORDER_LINES_SQL: &str = include_str!("../sql/list_order_lines.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderDetailsRepository;

impl PgOrderDetailsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Snapshot a priced line into the order.
    pub(crate) async fn create_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        product_name: &str,
        selection: &OptionSelection,
        quote: &PriceQuote,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderDetailRecord>(CREATE_DETAIL_SQL)
            .bind(OrderDetailUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(quote.product_uuid)
            .bind(product_name)
            .bind(selection.values())
            .bind(selection.combination())
            .bind(quantity_param(quote.quantity)?)
            .bind(amount_param(quote.base_price, "base_price")?)
            .bind(quote.option_price)
            .bind(amount_param(quote.unit_price, "unit_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_detail(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: OrderDetailUuid,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderDetailRecord>(GET_DETAIL_SQL)
            .bind(detail.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_detail_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: OrderDetailUuid,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderDetailRecord>(GET_DETAIL_FOR_UPDATE_SQL)
            .bind(detail.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock every line of an order.
    pub(crate) async fn list_details_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderDetailRecord>, sqlx::Error> {
        query_as::<Postgres, OrderDetailRecord>(LIST_DETAILS_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_detail_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: OrderDetailUuid,
        status: LineStatus,
    ) -> Result<OrderDetailRecord, sqlx::Error> {
        query_as::<Postgres, OrderDetailRecord>(SET_DETAIL_STATUS_SQL)
            .bind(detail.into_uuid())
            .bind(status.code())
            .fetch_one(&mut **tx)
            .await
    }

    /// Cancel every line of an order. Returns the number of lines changed.
    pub(crate) async fn cancel_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CANCEL_DETAILS_SQL)
            .bind(order.into_uuid())
            .bind(LineStatus::Canceled.code())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Lines of an order with product and option names.
    pub(crate) async fn list_order_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        query_as::<Postgres, OrderLine>(LIST_ORDER_LINES_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderDetailRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderDetailUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            product_name: row.try_get("product_name")?,
            selection: try_get_selection(row)?,
            quantity: try_get_quantity(row, "quantity")?,
            base_price: try_get_amount(row, "base_price")?,
            option_price: row.try_get("option_price")?,
            unit_price: try_get_amount(row, "unit_price")?,
            order_status: try_get_code(row, "order_status", LineStatus::from_code)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            detail: OrderDetailRecord::from_row(row)?,
            option_names: row.try_get("option_names")?,
            combination_name: row.try_get("combination_name")?,
        })
    }
}
