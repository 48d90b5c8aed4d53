//! Change Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use storefront::{
    changes::ApprovalStatus,
    orders::{LineStatus, OrderNumber},
};

use crate::{
    database::{try_get_code, try_get_parsed, try_get_quantity},
    domain::{
        changes::{
            data::NewChangeRequest,
            models::ChangeRequest,
            records::{ChangeItemRecord, ChangeItemUuid},
        },
        members::records::MemberUuid,
        orders::records::{OrderDetailUuid, OrderUuid},
    },
};

const CREATE_CHANGE_ITEM_SQL: &str = include_str!("sql/create_change_item.sql");
const GET_CHANGE_ITEM_FOR_UPDATE_SQL: &str = include_str!("sql/get_change_item_for_update.sql");
const RESOLVE_CHANGE_ITEM_SQL: &str = include_str!("sql/resolve_change_item.sql");
const DELETE_CHANGE_ITEM_SQL: &str = include_str!("sql/delete_change_item.sql");
const LIST_MEMBER_CHANGES_SQL: &str = include_str!("sql/list_member_changes.sql");
const LIST_PENDING_CHANGES_SQL: &str = include_str!("sql/list_pending_changes.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgChangeItemsRepository;

impl PgChangeItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_change_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &NewChangeRequest,
    ) -> Result<ChangeItemRecord, sqlx::Error> {
        query_as::<Postgres, ChangeItemRecord>(CREATE_CHANGE_ITEM_SQL)
            .bind(request.uuid.into_uuid())
            .bind(request.order_detail_uuid.into_uuid())
            .bind(request.kind.as_str())
            .bind(&request.reason)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_change_item_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        change: ChangeItemUuid,
    ) -> Result<ChangeItemRecord, sqlx::Error> {
        query_as::<Postgres, ChangeItemRecord>(GET_CHANGE_ITEM_FOR_UPDATE_SQL)
            .bind(change.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Move a pending request to `status`. `None` when it was no longer pending.
    pub(crate) async fn resolve_change_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        change: ChangeItemUuid,
        status: ApprovalStatus,
    ) -> Result<Option<ChangeItemRecord>, sqlx::Error> {
        query_as::<Postgres, ChangeItemRecord>(RESOLVE_CHANGE_ITEM_SQL)
            .bind(change.into_uuid())
            .bind(status.code())
            .bind(ApprovalStatus::Pending.code())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Delete a request that is still pending. Returns rows affected.
    pub(crate) async fn delete_pending_change_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        change: ChangeItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CHANGE_ITEM_SQL)
            .bind(change.into_uuid())
            .bind(ApprovalStatus::Pending.code())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// A member's requests, newest first.
    pub(crate) async fn list_member_changes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
    ) -> Result<Vec<ChangeRequest>, sqlx::Error> {
        query_as::<Postgres, ChangeRequest>(LIST_MEMBER_CHANGES_SQL)
            .bind(member.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Requests awaiting a decision, oldest first.
    pub(crate) async fn list_pending_changes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ChangeRequest>, sqlx::Error> {
        query_as::<Postgres, ChangeRequest>(LIST_PENDING_CHANGES_SQL)
            .bind(ApprovalStatus::Pending.code())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ChangeItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ChangeItemUuid::from_uuid(row.try_get("uuid")?),
            order_detail_uuid: OrderDetailUuid::from_uuid(row.try_get("order_detail_uuid")?),
            kind: try_get_parsed(row, "kind")?,
            reason: row.try_get("reason")?,
            approval_status: try_get_code(row, "approval_status", ApprovalStatus::from_code)?,
            resolved_at: row
                .try_get::<Option<SqlxTimestamp>, _>("resolved_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ChangeRequest {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            change: ChangeItemRecord::from_row(row)?,
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            order_number: OrderNumber::from_stored(row.try_get("order_number")?),
            member_uuid: MemberUuid::from_uuid(row.try_get("member_uuid")?),
            product_name: row.try_get("product_name")?,
            quantity: try_get_quantity(row, "quantity")?,
            line_status: try_get_code(row, "order_status", LineStatus::from_code)?,
        })
    }
}
