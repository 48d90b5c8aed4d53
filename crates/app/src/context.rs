//! App Context

use std::sync::Arc;

use storefront::orders::DeliveryFeePolicy;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        changes::{ChangesService, PgChangesService},
        members::{MembersService, PgMembersService},
        orders::{OrdersService, PgOrdersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub changes: Arc<dyn ChangesService>,
    pub members: Arc<dyn MembersService>,
}

impl AppContext {
    /// Build the services over one pool.
    #[must_use]
    pub fn from_db(db: &Db, policy: DeliveryFeePolicy) -> Self {
        Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone())),
            orders: Arc::new(PgOrdersService::new(db.clone(), policy)),
            changes: Arc::new(PgChangesService::new(db.clone())),
            members: Arc::new(PgMembersService::new(db.clone())),
        }
    }

    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or applying
    /// migrations fails.
    pub async fn from_database_url(
        url: &str,
        policy: DeliveryFeePolicy,
        run_migrations: bool,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        if run_migrations {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        Ok(Self::from_db(&Db::new(pool), policy))
    }
}
