//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use storefront::pricing::resolve_price;
use tracing::info;

use crate::{
    database::{Db, MAX_QUANTITY},
    domain::{
        carts::{
            data::{CartLineKey, NewCartLine},
            errors::CartsServiceError,
            models::Cart,
            records::{CartLineRecord, CartLineUuid},
            repository::PgCartLinesRepository,
        },
        catalog::repository::PgCatalogRepository,
        members::records::MemberUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    lines: PgCartLinesRepository,
    catalog: PgCatalogRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            lines: PgCartLinesRepository::new(),
            catalog: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, member: MemberUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let lines = self.lines.list_lines(&mut tx, member).await?;

        tx.commit().await?;

        Ok(Cart {
            member_uuid: member,
            lines,
        })
    }

    #[tracing::instrument(
        name = "carts.service.add_line",
        skip(self, line),
        fields(member_uuid = %member, product_uuid = %line.product_uuid, quantity = line.quantity),
        err
    )]
    async fn add_line(
        &self,
        member: MemberUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError> {
        if line.quantity == 0 || line.quantity > MAX_QUANTITY {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin_transaction().await?;

        let existing = self
            .lines
            .find_line_for_update(&mut tx, member, line.product_uuid, &line.selection)
            .await?;

        let record = if let Some(existing) = existing {
            existing
                .quantity
                .checked_add(line.quantity)
                .filter(|total| *total <= MAX_QUANTITY)
                .ok_or(CartsServiceError::InvalidQuantity)?;

            self.lines
                .add_quantity(&mut tx, existing.uuid, line.quantity)
                .await?
        } else {
            let snapshot = self
                .catalog
                .load_snapshot(&mut tx, line.product_uuid, &line.selection)
                .await?;

            let quote = resolve_price(&snapshot.to_catalog(), &line.selection, line.quantity)?;

            self.lines
                .create_line(&mut tx, member, &line.selection, &quote)
                .await?
                .ok_or(CartsServiceError::InvalidQuantity)?
        };

        tx.commit().await?;

        info!(cart_line_uuid = %record.uuid, quantity = record.quantity, "added cart line");

        Ok(record)
    }

    async fn update_quantity(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
        quantity: i64,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|quantity| (1..=MAX_QUANTITY).contains(quantity))
            .ok_or(CartsServiceError::InvalidQuantity)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .lines
            .set_quantity(&mut tx, member, line, quantity)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn toggle_checked(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let updated = self.lines.toggle_checked(&mut tx, member, line).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_all_checked(
        &self,
        member: MemberUuid,
        checked: bool,
    ) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.lines.set_all_checked(&mut tx, member, checked).await?;

        tx.commit().await?;

        Ok(rows_affected)
    }

    #[tracing::instrument(
        name = "carts.service.remove_line",
        skip(self, key),
        fields(member_uuid = %member, product_uuid = %key.product_uuid),
        err
    )]
    async fn remove_line(&self, member: MemberUuid, key: CartLineKey) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self
            .lines
            .delete_matching_line(&mut tx, member, key.product_uuid, &key.selection)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        info!("removed cart line");

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.reprice_line",
        skip(self),
        fields(member_uuid = %member, cart_line_uuid = %line),
        err
    )]
    async fn reprice_line(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.lines.get_line_for_update(&mut tx, member, line).await?;

        let snapshot = self
            .catalog
            .load_snapshot(&mut tx, current.product_uuid, &current.selection)
            .await?;

        let quote = resolve_price(&snapshot.to_catalog(), &current.selection, current.quantity)?;

        let updated = self.lines.update_line_price(&mut tx, line, &quote).await?;

        tx.commit().await?;

        info!(
            previous_unit_price = current.unit_price,
            unit_price = updated.unit_price,
            "repriced cart line"
        );

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The member's lines, oldest first.
    async fn get_cart(&self, member: MemberUuid) -> Result<Cart, CartsServiceError>;

    /// Add a product with options, merging into an existing line with the same
    /// selection. A merge keeps the existing price snapshot.
    async fn add_line(
        &self,
        member: MemberUuid,
        line: NewCartLine,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Overwrite a line's quantity.
    async fn update_quantity(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
        quantity: i64,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Flip a line's checked flag.
    async fn toggle_checked(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError>;

    /// Check or uncheck every line. Returns the number of lines changed.
    async fn set_all_checked(
        &self,
        member: MemberUuid,
        checked: bool,
    ) -> Result<u64, CartsServiceError>;

    /// Remove the line holding exactly this product and selection.
    async fn remove_line(&self, member: MemberUuid, key: CartLineKey) -> Result<(), CartsServiceError>;

    /// Refresh a line's price snapshot from the current catalog.
    async fn reprice_line(
        &self,
        member: MemberUuid,
        line: CartLineUuid,
    ) -> Result<CartLineRecord, CartsServiceError>;
}
