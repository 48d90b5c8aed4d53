//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::orders::{DeliveryStatus, OrderNumber, OrderTotals};

use crate::{
    database::{amount_param, try_get_amount, try_get_parsed},
    domain::{
        members::records::MemberUuid,
        orders::{
            data::{DeliveryUpdate, Recipient},
            records::{OrderRecord, OrderUuid},
        },
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_ORDER_FOR_UPDATE_SQL: &str = include_str!("../sql/get_order_for_update.sql");
const LIST_MEMBER_ORDERS_SQL: &str = include_str!("../sql/list_member_orders.sql");
const SET_DELIVERY_STATUS_SQL: &str = include_str!("../sql/set_delivery_status.sql");
const UPDATE_DELIVERY_SQL: &str = include_str!("../sql/update_delivery.sql");
const MARK_PAID_SQL: &str = include_str!("../sql/mark_paid.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        order_number: &OrderNumber,
        member: MemberUuid,
        recipient: &Recipient,
        totals: &OrderTotals,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(order_number.as_str())
            .bind(member.into_uuid())
            .bind(&recipient.name)
            .bind(&recipient.phone)
            .bind(&recipient.postal_code)
            .bind(&recipient.address)
            .bind(&recipient.address_detail)
            .bind(recipient.delivery_message.as_deref())
            .bind(amount_param(totals.total_price, "total_price")?)
            .bind(amount_param(totals.discount_price, "discount_price")?)
            .bind(amount_param(totals.delivery_price, "delivery_price")?)
            .bind(amount_param(totals.mileage_used, "mileage_used")?)
            .bind(amount_param(totals.final_price, "final_price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// A member's orders, newest first.
    pub(crate) async fn list_member_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_MEMBER_ORDERS_SQL)
            .bind(member.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_delivery_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: DeliveryStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_DELIVERY_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply a delivery update. Absent carrier or tracking keep their values.
    pub(crate) async fn update_delivery(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        update: &DeliveryUpdate,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_DELIVERY_SQL)
            .bind(update.order_uuid.into_uuid())
            .bind(update.delivery_status.as_str())
            .bind(update.carrier.as_deref())
            .bind(update.tracking_number.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: DeliveryStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(MARK_PAID_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: OrderNumber::from_stored(row.try_get("order_number")?),
            member_uuid: MemberUuid::from_uuid(row.try_get("member_uuid")?),
            recipient: Recipient {
                name: row.try_get("recipient_name")?,
                phone: row.try_get("recipient_phone")?,
                postal_code: row.try_get("postal_code")?,
                address: row.try_get("address")?,
                address_detail: row.try_get("address_detail")?,
                delivery_message: row.try_get("delivery_message")?,
            },
            total_price: try_get_amount(row, "total_price")?,
            discount_price: try_get_amount(row, "discount_price")?,
            delivery_price: try_get_amount(row, "delivery_price")?,
            mileage_used: try_get_amount(row, "mileage_used")?,
            final_price: try_get_amount(row, "final_price")?,
            delivery_status: try_get_parsed(row, "delivery_status")?,
            carrier: row.try_get("carrier")?,
            tracking_number: row.try_get("tracking_number")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
