//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashSet;
use sqlx::{Postgres, Transaction};
use storefront::{
    catalog::Availability,
    orders::{
        DeliveryFeePolicy, DeliveryStatus, OrderNumber, OrderTotals, PriceMismatch,
        verify_line_price,
    },
    pricing::{PriceQuote, resolve_price},
};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::repository::PgCartLinesRepository,
        catalog::repository::PgCatalogRepository,
        members::{records::MemberUuid, repository::PgMembersRepository},
        orders::{
            data::{DeliveryUpdate, NewOrder, NewOrderLine, PaymentConfirmation},
            errors::OrdersServiceError,
            models::Order,
            records::{OrderRecord, OrderUuid},
            repositories::{PgOrderDetailsRepository, PgOrdersRepository, PgPaymentsRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    policy: DeliveryFeePolicy,
    orders: PgOrdersRepository,
    details: PgOrderDetailsRepository,
    payments: PgPaymentsRepository,
    members: PgMembersRepository,
    catalog: PgCatalogRepository,
    cart_lines: PgCartLinesRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, policy: DeliveryFeePolicy) -> Self {
        Self {
            db,
            policy,
            orders: PgOrdersRepository::new(),
            details: PgOrderDetailsRepository::new(),
            payments: PgPaymentsRepository::new(),
            members: PgMembersRepository::new(),
            catalog: PgCatalogRepository::new(),
            cart_lines: PgCartLinesRepository::new(),
        }
    }

    /// Check availability and re-price one requested line.
    async fn price_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        line: &NewOrderLine,
    ) -> Result<(String, PriceQuote), OrdersServiceError> {
        let unavailable = OrdersServiceError::UnavailableProduct(line.product_uuid.into_uuid());

        let snapshot = match self
            .catalog
            .load_snapshot(tx, line.product_uuid, &line.selection)
            .await
        {
            Ok(snapshot) => snapshot,
            Err(sqlx::Error::RowNotFound) => return Err(unavailable),
            Err(error) => return Err(error.into()),
        };

        let catalog = snapshot.to_catalog();

        if catalog.availability(&line.selection) != Availability::Orderable {
            return Err(unavailable);
        }

        let quote = resolve_price(&catalog, &line.selection, line.quantity)?;

        verify_line_price(&quote, line.declared_base_price, line.declared_option_price)?;

        Ok((snapshot.product.name, quote))
    }

    /// Cancel every line, mark the order cancelled and hand back used mileage.
    async fn void_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderRecord,
    ) -> Result<OrderRecord, OrdersServiceError> {
        self.details.cancel_details(tx, order.uuid).await?;

        let voided = self
            .orders
            .set_delivery_status(tx, order.uuid, DeliveryStatus::OrderCanceled)
            .await?;

        if order.mileage_used > 0 {
            self.members
                .credit_mileage(tx, order.member_uuid, order.mileage_used)
                .await?;
        }

        Ok(voided)
    }

    async fn load_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<Order, OrdersServiceError> {
        let lines = self.details.list_order_lines(tx, order.uuid).await?;
        let payment = self.payments.get_payment(tx, order.uuid).await?;

        Ok(Order {
            order,
            lines,
            payment,
        })
    }
}

fn validate_new_order(order: &NewOrder) -> Result<(), OrdersServiceError> {
    if order.lines.is_empty() {
        return Err(OrdersServiceError::Validation(
            "an order needs at least one line".to_string(),
        ));
    }

    if let Some(field) = order.recipient.first_blank_field() {
        return Err(OrdersServiceError::Validation(format!("{field} is required")));
    }

    let mut seen = FxHashSet::default();

    for line in &order.lines {
        if line.quantity == 0 {
            return Err(OrdersServiceError::Validation(
                "quantity must be at least 1".to_string(),
            ));
        }

        if !seen.insert((line.product_uuid, &line.selection)) {
            return Err(OrdersServiceError::Validation(format!(
                "product {} appears twice with the same options",
                line.product_uuid
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, order),
        fields(member_uuid = %member, order_uuid = %order.uuid, lines = order.lines.len()),
        err
    )]
    async fn create_order(
        &self,
        member: MemberUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        validate_new_order(&order)?;

        let mut tx = self.db.begin_transaction().await?;

        self.members.lock_member(&mut tx, member).await?;

        let mut priced = Vec::with_capacity(order.lines.len());

        for line in &order.lines {
            let (product_name, quote) = self.price_line(&mut tx, line).await?;

            priced.push((line, product_name, quote));
        }

        let totals = OrderTotals::compute(
            priced.iter().map(|(_, _, quote)| quote),
            &self.policy,
            order.mileage,
        )?;

        totals.verify(&order.declared)?;

        if totals.mileage_used > 0 {
            let debited = self
                .members
                .debit_mileage(&mut tx, member, totals.mileage_used)
                .await?;

            if debited == 0 {
                return Err(OrdersServiceError::InsufficientMileage);
            }
        }

        let order_number = OrderNumber::generate();

        let created = self
            .orders
            .create_order(
                &mut tx,
                order.uuid,
                &order_number,
                member,
                &order.recipient,
                &totals,
            )
            .await?;

        for (line, product_name, quote) in &priced {
            self.details
                .create_detail(&mut tx, created.uuid, product_name, &line.selection, quote)
                .await?;

            self.cart_lines
                .delete_matching_line(&mut tx, member, line.product_uuid, &line.selection)
                .await?;
        }

        self.payments
            .create_payment(&mut tx, created.uuid, order.payment_method, totals.final_price)
            .await?;

        let created = self.load_order(&mut tx, created).await?;

        tx.commit().await?;

        info!(
            order_number = %created.order.order_number,
            final_price = created.order.final_price,
            mileage_used = created.order.mileage_used,
            "created order"
        );

        Ok(created)
    }

    async fn get_order(
        &self,
        member: MemberUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.orders.get_order(&mut tx, order).await?;

        if record.member_uuid != member {
            return Err(OrdersServiceError::Forbidden);
        }

        let loaded = self.load_order(&mut tx, record).await?;

        tx.commit().await?;

        Ok(loaded)
    }

    async fn list_orders(&self, member: MemberUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let orders = self.orders.list_member_orders(&mut tx, member).await?;

        tx.commit().await?;

        Ok(orders)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self),
        fields(member_uuid = %member, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        member: MemberUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.get_order_for_update(&mut tx, order).await?;

        if current.member_uuid != member {
            return Err(OrdersServiceError::Forbidden);
        }

        current.delivery_status.cancel_by_customer()?;

        for detail in self.details.list_details_for_update(&mut tx, order).await? {
            detail.order_status.cancel()?;
        }

        let payment = self.payments.get_payment_for_update(&mut tx, order).await?;
        let payment_status = payment.status.cancel()?;

        self.payments
            .update_status(&mut tx, payment.uuid, payment_status, None)
            .await?;

        let voided = self.void_order(&mut tx, &current).await?;
        let cancelled = self.load_order(&mut tx, voided).await?;

        tx.commit().await?;

        info!(refunded_mileage = current.mileage_used, "cancelled order");

        Ok(cancelled)
    }

    #[tracing::instrument(
        name = "orders.service.confirm_payment",
        skip(self, confirmation),
        fields(order_uuid = %order, outcome = %confirmation.outcome),
        err
    )]
    async fn confirm_payment(
        &self,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self.orders.get_order_for_update(&mut tx, order).await?;
        let payment = self.payments.get_payment_for_update(&mut tx, order).await?;

        let payment_status = payment.status.settle(confirmation.outcome)?;

        if confirmation.amount != payment.amount {
            return Err(PriceMismatch {
                field: "amount",
                declared: i128::from(confirmation.amount),
                computed: i128::from(payment.amount),
            }
            .into());
        }

        self.payments
            .update_status(
                &mut tx,
                payment.uuid,
                payment_status,
                Some(&confirmation.gateway_key),
            )
            .await?;

        let updated = if confirmation.outcome.voids_order() {
            self.void_order(&mut tx, &current).await?
        } else {
            let delivery_status = current.delivery_status.mark_paid()?;

            self.orders.mark_paid(&mut tx, order, delivery_status).await?
        };

        let confirmed = self.load_order(&mut tx, updated).await?;

        tx.commit().await?;

        info!(
            payment_status = %confirmed.payment.status,
            delivery_status = %confirmed.order.delivery_status,
            "confirmed payment"
        );

        Ok(confirmed)
    }

    #[tracing::instrument(
        name = "orders.service.update_delivery",
        skip(self, updates),
        fields(orders = updates.len()),
        err
    )]
    async fn update_delivery(
        &self,
        updates: Vec<DeliveryUpdate>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        if updates.is_empty() {
            return Err(OrdersServiceError::Validation(
                "no orders to update".to_string(),
            ));
        }

        let mut tx = self.db.begin_transaction().await?;
        let mut updated = Vec::with_capacity(updates.len());

        for update in &updates {
            let current = self
                .orders
                .get_order_for_update(&mut tx, update.order_uuid)
                .await?;

            current
                .delivery_status
                .update_delivery(update.delivery_status)?;

            updated.push(self.orders.update_delivery(&mut tx, update).await?);
        }

        tx.commit().await?;

        info!(orders = updated.len(), "updated delivery");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turn requested lines into an order, all or nothing.
    ///
    /// Prices and totals are recomputed server-side and must match the declared
    /// values exactly. Mileage is debited and the matching cart lines removed in
    /// the same transaction.
    async fn create_order(
        &self,
        member: MemberUuid,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// One of the member's orders with its lines and payment.
    async fn get_order(
        &self,
        member: MemberUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// The member's orders, newest first.
    async fn list_orders(&self, member: MemberUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Cancel an order that has not started preparation and whose lines are
    /// all untouched. Voids the payment and refunds mileage.
    async fn cancel_order(
        &self,
        member: MemberUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;

    /// Record the gateway's verdict on an order's pending payment.
    async fn confirm_payment(
        &self,
        order: OrderUuid,
        confirmation: PaymentConfirmation,
    ) -> Result<Order, OrdersServiceError>;

    /// Apply delivery changes to several orders in one transaction.
    async fn update_delivery(
        &self,
        updates: Vec<DeliveryUpdate>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use storefront::{
        catalog::StockStatus,
        orders::{DeclaredTotals, LineStatus, ORDER_NUMBER_PREFIX, TotalsError},
        payments::{PaymentOutcome, PaymentStatus},
    };
    use testresult::TestResult;

    use crate::{
        domain::{carts::CartsService, catalog::CatalogService, members::MembersService},
        test::{TestContext, helpers},
    };

    use super::*;

    fn declared(total_price: u64, delivery_price: u64, final_price: u64) -> DeclaredTotals {
        DeclaredTotals {
            total_price,
            discount_price: 0,
            delivery_price,
            final_price,
        }
    }

    #[tokio::test]
    async fn checkout_with_option_succeeds_and_clears_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let (_, values) =
            helpers::create_option(&ctx, product.uuid, "Size", true, 0, &[("Large", 2_000)]).await?;
        let large = values.first().ok_or("missing large")?.uuid.into_uuid();

        helpers::add_line(&ctx, member.uuid, product.uuid, &[large], 2).await?;

        let order = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[large], 2, 10_000, 2_000)?],
                    declared(24_000, 3_000, 27_000),
                    0,
                ),
            )
            .await?;

        assert!(order.order.order_number.as_str().starts_with(ORDER_NUMBER_PREFIX));
        assert_eq!(order.order.delivery_status, DeliveryStatus::PaymentPending);
        assert_eq!(order.order.final_price, 27_000);
        assert_eq!(order.payment.status, PaymentStatus::Pending);
        assert_eq!(order.payment.amount, 27_000);

        let line = order.lines.first().ok_or("missing line")?;

        assert_eq!(line.detail.unit_price, 12_000);
        assert_eq!(line.detail.line_total(), Some(24_000));
        assert_eq!(line.detail.order_status, LineStatus::Ordered);
        assert_eq!(line.option_names, vec!["Large".to_string()]);

        assert!(ctx.carts.get_cart(member.uuid).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn understated_final_price_persists_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 5_000).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let (_, values) =
            helpers::create_option(&ctx, product.uuid, "Size", true, 0, &[("Large", 2_000)]).await?;
        let large = values.first().ok_or("missing large")?.uuid.into_uuid();

        helpers::add_line(&ctx, member.uuid, product.uuid, &[large], 2).await?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[large], 2, 10_000, 2_000)?],
                    declared(24_000, 3_000, 20_000),
                    1_000,
                ),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::PriceMismatch(PriceMismatch { field: "final_price", .. }))
            ),
            "expected PriceMismatch, got {result:?}"
        );

        assert!(ctx.orders.list_orders(member.uuid).await?.is_empty());
        assert_eq!(ctx.carts.get_cart(member.uuid).await?.lines.len(), 1);
        assert_eq!(ctx.members.get_member(member.uuid).await?.mileage, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn stale_base_price_is_a_mismatch() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 9_000, 0)?],
                    declared(9_000, 3_000, 12_000),
                    0,
                ),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::PriceMismatch(PriceMismatch { field: "base_price", .. }))
            ),
            "expected PriceMismatch, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_product_aborts_whole_order() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 5_000).await?;
        let fine = helpers::create_product(&ctx, 10_000).await?;
        let sold_out =
            helpers::create_product_with_stock(&ctx, 5_000, StockStatus::OutOfStock).await?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![
                        helpers::order_line(fine.uuid, &[], 1, 10_000, 0)?,
                        helpers::order_line(sold_out.uuid, &[], 1, 5_000, 0)?,
                    ],
                    declared(15_000, 3_000, 17_000),
                    1_000,
                ),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::UnavailableProduct(uuid)) if uuid == sold_out.uuid.into_uuid()),
            "expected UnavailableProduct, got {result:?}"
        );

        assert!(ctx.orders.list_orders(member.uuid).await?.is_empty());
        assert_eq!(ctx.members.get_member(member.uuid).await?.mileage, 5_000);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_is_unavailable() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        ctx.catalog.delete_product(product.uuid).await?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 13_000),
                    0,
                ),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::UnavailableProduct(_))),
            "expected UnavailableProduct, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn mileage_is_debited_and_checked() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 1_000).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let short = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 11_000),
                    2_000,
                ),
            )
            .await;

        assert!(
            matches!(short, Err(OrdersServiceError::InsufficientMileage)),
            "expected InsufficientMileage, got {short:?}"
        );

        let order = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 12_000),
                    1_000,
                ),
            )
            .await?;

        assert_eq!(order.order.mileage_used, 1_000);
        assert_eq!(order.payment.amount, 12_000);
        assert_eq!(ctx.members.get_member(member.uuid).await?.mileage, 0);

        Ok(())
    }

    #[tokio::test]
    async fn mileage_above_payable_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 100_000).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 0),
                    20_000,
                ),
            )
            .await;

        assert!(
            matches!(
                result,
                Err(OrdersServiceError::Totals(TotalsError::MileageExceedsPayable { .. }))
            ),
            "expected MileageExceedsPayable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_lines_are_a_validation_error() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let line = helpers::order_line(product.uuid, &[], 1, 10_000, 0)?;

        let result = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(vec![line.clone(), line], declared(20_000, 3_000, 23_000), 0),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let result = ctx
            .orders
            .create_order(
                MemberUuid::new(),
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 13_000),
                    0,
                ),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_members_order_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = helpers::create_member(&ctx, 0).await?;
        let stranger = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let order = helpers::place_order(&ctx, owner.uuid, &[&product]).await?;

        let result = ctx.orders.get_order(stranger.uuid, order.order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        let fetched = ctx.orders.get_order(owner.uuid, order.order.uuid).await?;

        assert_eq!(fetched.order.order_number, order.order.order_number);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_is_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let first = helpers::place_order(&ctx, member.uuid, &[&product]).await?;
        let second = helpers::place_order(&ctx, member.uuid, &[&product]).await?;

        let uuids: Vec<OrderUuid> = ctx
            .orders
            .list_orders(member.uuid)
            .await?
            .into_iter()
            .map(|order| order.uuid)
            .collect();

        assert_eq!(uuids, vec![second.order.uuid, first.order.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn customer_cancel_voids_payment_and_refunds_mileage() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 1_000).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let order = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 12_000),
                    1_000,
                ),
            )
            .await?;

        let cancelled = ctx.orders.cancel_order(member.uuid, order.order.uuid).await?;

        assert_eq!(cancelled.order.delivery_status, DeliveryStatus::OrderCanceled);
        assert_eq!(cancelled.payment.status, PaymentStatus::Cancelled);
        assert!(
            cancelled
                .lines
                .iter()
                .all(|line| line.detail.order_status == LineStatus::Canceled)
        );
        assert_eq!(ctx.members.get_member(member.uuid).await?.mileage, 1_000);

        let again = ctx.orders.cancel_order(member.uuid, order.order.uuid).await;

        assert!(
            matches!(again, Err(OrdersServiceError::InvalidStateTransition(_))),
            "expected InvalidStateTransition, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn shipped_order_cannot_be_cancelled() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let order = helpers::place_order(&ctx, member.uuid, &[&product]).await?;

        ctx.orders
            .update_delivery(vec![DeliveryUpdate {
                order_uuid: order.order.uuid,
                delivery_status: DeliveryStatus::Shipping,
                carrier: Some("CJ".to_string()),
                tracking_number: Some("1234".to_string()),
            }])
            .await?;

        let result = ctx.orders.cancel_order(member.uuid, order.order.uuid).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidStateTransition(_))),
            "expected InvalidStateTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn completed_payment_marks_order_paid_once() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let order = helpers::place_order(&ctx, member.uuid, &[&product]).await?;

        let wrong_amount = ctx
            .orders
            .confirm_payment(
                order.order.uuid,
                PaymentConfirmation {
                    gateway_key: "pg-1".to_string(),
                    outcome: PaymentOutcome::Completed,
                    amount: 1,
                },
            )
            .await;

        assert!(
            matches!(wrong_amount, Err(OrdersServiceError::PriceMismatch(_))),
            "expected PriceMismatch, got {wrong_amount:?}"
        );

        let confirmed = ctx
            .orders
            .confirm_payment(
                order.order.uuid,
                PaymentConfirmation {
                    gateway_key: "pg-1".to_string(),
                    outcome: PaymentOutcome::Completed,
                    amount: order.payment.amount,
                },
            )
            .await?;

        assert_eq!(confirmed.payment.status, PaymentStatus::Completed);
        assert_eq!(confirmed.payment.gateway_key.as_deref(), Some("pg-1"));
        assert_eq!(confirmed.order.delivery_status, DeliveryStatus::PaymentCompleted);
        assert!(confirmed.order.paid_at.is_some());

        let again = ctx
            .orders
            .confirm_payment(
                order.order.uuid,
                PaymentConfirmation {
                    gateway_key: "pg-2".to_string(),
                    outcome: PaymentOutcome::Failed,
                    amount: order.payment.amount,
                },
            )
            .await;

        assert!(
            matches!(again, Err(OrdersServiceError::InvalidStateTransition(_))),
            "expected InvalidStateTransition, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_payment_voids_order() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 1_000).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;

        let order = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(product.uuid, &[], 1, 10_000, 0)?],
                    declared(10_000, 3_000, 12_500),
                    500,
                ),
            )
            .await?;

        let confirmed = ctx
            .orders
            .confirm_payment(
                order.order.uuid,
                PaymentConfirmation {
                    gateway_key: "pg-9".to_string(),
                    outcome: PaymentOutcome::Failed,
                    amount: 12_500,
                },
            )
            .await?;

        assert_eq!(confirmed.payment.status, PaymentStatus::Failed);
        assert_eq!(confirmed.order.delivery_status, DeliveryStatus::OrderCanceled);
        assert!(
            confirmed
                .lines
                .iter()
                .all(|line| line.detail.order_status == LineStatus::Canceled)
        );
        assert_eq!(ctx.members.get_member(member.uuid).await?.mileage, 1_000);

        Ok(())
    }

    #[tokio::test]
    async fn delivery_batch_is_all_or_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let order = helpers::place_order(&ctx, member.uuid, &[&product]).await?;

        let result = ctx
            .orders
            .update_delivery(vec![
                DeliveryUpdate {
                    order_uuid: order.order.uuid,
                    delivery_status: DeliveryStatus::Preparing,
                    carrier: None,
                    tracking_number: None,
                },
                DeliveryUpdate {
                    order_uuid: OrderUuid::new(),
                    delivery_status: DeliveryStatus::Preparing,
                    carrier: None,
                    tracking_number: None,
                },
            ])
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let unchanged = ctx.orders.get_order(member.uuid, order.order.uuid).await?;

        assert_eq!(unchanged.order.delivery_status, DeliveryStatus::PaymentPending);

        Ok(())
    }

    #[tokio::test]
    async fn delivery_update_cannot_cancel() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let order = helpers::place_order(&ctx, member.uuid, &[&product]).await?;

        let result = ctx
            .orders
            .update_delivery(vec![DeliveryUpdate {
                order_uuid: order.order.uuid,
                delivery_status: DeliveryStatus::OrderCanceled,
                carrier: None,
                tracking_number: None,
            }])
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidStateTransition(_))),
            "expected InvalidStateTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_lines_keep_names_of_deleted_options() -> TestResult {
        let ctx = TestContext::new().await;
        let member = helpers::create_member(&ctx, 0).await?;
        let product = helpers::create_product(&ctx, 10_000).await?;
        let (_, values) =
            helpers::create_option(&ctx, product.uuid, "Size", false, 0, &[("Large", 2_000)]).await?;
        let large = values.first().ok_or("missing large")?;

        let order = ctx
            .orders
            .create_order(
                member.uuid,
                helpers::new_order(
                    vec![helpers::order_line(
                        product.uuid,
                        &[large.uuid.into_uuid()],
                        1,
                        10_000,
                        2_000,
                    )?],
                    declared(12_000, 3_000, 15_000),
                    0,
                ),
            )
            .await?;

        ctx.catalog.delete_option_value(large.uuid).await?;

        let fetched = ctx.orders.get_order(member.uuid, order.order.uuid).await?;
        let line = fetched.lines.first().ok_or("missing line")?;

        assert_eq!(line.option_names, vec!["Large".to_string()]);
        assert_eq!(line.detail.product_name, product.name);

        Ok(())
    }
}
