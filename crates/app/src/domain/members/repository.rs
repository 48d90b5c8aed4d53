//! Members Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{amount_param, try_get_amount},
    domain::members::{
        data::NewMember,
        records::{MemberRecord, MemberUuid},
    },
};

const CREATE_MEMBER_SQL: &str = include_str!("sql/create_member.sql");
const GET_MEMBER_SQL: &str = include_str!("sql/get_member.sql");
const LOCK_MEMBER_SQL: &str = include_str!("sql/lock_member.sql");
const DEBIT_MILEAGE_SQL: &str = include_str!("sql/debit_mileage.sql");
const CREDIT_MILEAGE_SQL: &str = include_str!("sql/credit_mileage.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMembersRepository;

impl PgMembersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_member(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: NewMember,
    ) -> Result<MemberRecord, sqlx::Error> {
        query_as::<Postgres, MemberRecord>(CREATE_MEMBER_SQL)
            .bind(member.uuid.into_uuid())
            .bind(member.name)
            .bind(amount_param(member.mileage, "mileage")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_member(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
    ) -> Result<MemberRecord, sqlx::Error> {
        query_as::<Postgres, MemberRecord>(GET_MEMBER_SQL)
            .bind(member.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the member row for the rest of the transaction.
    pub(crate) async fn lock_member(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
    ) -> Result<MemberRecord, sqlx::Error> {
        query_as::<Postgres, MemberRecord>(LOCK_MEMBER_SQL)
            .bind(member.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Debit mileage when the balance covers it. Returns rows affected.
    pub(crate) async fn debit_mileage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        amount: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DEBIT_MILEAGE_SQL)
            .bind(member.into_uuid())
            .bind(amount_param(amount, "mileage")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn credit_mileage(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        member: MemberUuid,
        amount: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CREDIT_MILEAGE_SQL)
            .bind(member.into_uuid())
            .bind(amount_param(amount, "mileage")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for MemberRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MemberUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            mileage: try_get_amount(row, "mileage")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
