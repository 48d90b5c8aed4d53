//! Database connection management

use sqlx::{
    PgPool, Postgres, Row, Transaction,
    migrate::{MigrateError, Migrator},
    postgres::PgRow,
};
use storefront::selection::OptionSelection;
use uuid::Uuid;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a read-committed transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin_transaction(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error when a migration fails or the history is inconsistent.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Read a non-negative money column.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Read a positive quantity column.
pub(crate) fn try_get_quantity(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let quantity: i32 = row.try_get(column)?;

    u32::try_from(quantity).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert a money amount for binding.
pub(crate) fn amount_param(amount: u64, column: &str) -> sqlx::Result<i64> {
    i64::try_from(amount).map_err(|e| sqlx::Error::Encode(format!("{column}: {e}").into()))
}

/// Largest quantity a line can hold.
pub(crate) const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Convert a quantity for binding.
pub(crate) fn quantity_param(quantity: u32) -> sqlx::Result<i32> {
    i32::try_from(quantity).map_err(|e| sqlx::Error::Encode(format!("quantity: {e}").into()))
}

/// Decode an enum column through its parser.
pub(crate) fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;

    raw.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Decode a `SMALLINT` status column through its code table.
pub(crate) fn try_get_code<T>(
    row: &PgRow,
    column: &str,
    from_code: impl FnOnce(i16) -> Option<T>,
) -> sqlx::Result<T> {
    let code: i16 = row.try_get(column)?;

    from_code(code).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("unknown code {code}").into(),
    })
}

/// Rebuild an option selection from its stored columns.
pub(crate) fn try_get_selection(row: &PgRow) -> sqlx::Result<OptionSelection> {
    let values: Vec<Uuid> = row.try_get("option_value_uuids")?;
    let combination: Option<Uuid> = row.try_get("option_combination_uuid")?;

    OptionSelection::from_parts(values, combination).map_err(|e| sqlx::Error::ColumnDecode {
        index: "option_value_uuids".to_string(),
        source: Box::new(e),
    })
}
