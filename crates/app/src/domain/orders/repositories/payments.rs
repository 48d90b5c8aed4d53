//! Payments Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::payments::{PaymentMethod, PaymentStatus};

use crate::{
    database::{amount_param, try_get_amount, try_get_parsed},
    domain::orders::records::{OrderUuid, PaymentRecord, PaymentUuid},
};

const CREATE_PAYMENT_SQL: &str = include_str!("../sql/create_payment.sql");
const GET_PAYMENT_SQL: &str = include_str!("../sql/get_payment.sql");
const GET_PAYMENT_FOR_UPDATE_SQL: &str = include_str!("../sql/get_payment_for_update.sql");
const UPDATE_PAYMENT_STATUS_SQL: &str = include_str!("../sql/update_payment_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentsRepository;

impl PgPaymentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Record a pending payment for an order.
    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        method: PaymentMethod,
        amount: u64,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(CREATE_PAYMENT_SQL)
            .bind(PaymentUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(method.as_str())
            .bind(amount_param(amount, "amount")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_payment_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(GET_PAYMENT_FOR_UPDATE_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Set the status, keeping the stored gateway key when none is given.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: PaymentUuid,
        status: PaymentStatus,
        gateway_key: Option<&str>,
    ) -> Result<PaymentRecord, sqlx::Error> {
        query_as::<Postgres, PaymentRecord>(UPDATE_PAYMENT_STATUS_SQL)
            .bind(payment.into_uuid())
            .bind(status.as_str())
            .bind(gateway_key)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PaymentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PaymentUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            method: try_get_parsed(row, "method")?,
            amount: try_get_amount(row, "amount")?,
            status: try_get_parsed(row, "status")?,
            gateway_key: row.try_get("gateway_key")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
