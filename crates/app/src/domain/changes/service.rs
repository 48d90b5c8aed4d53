//! Changes service.

use async_trait::async_trait;
use mockall::automock;
use storefront::{
    changes::{Decision, request_change, resolved_line_status, withdraw_change},
    orders::{LineStatus, aggregate_delivery_status},
    transition::TransitionError,
};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        changes::{
            data::NewChangeRequest,
            errors::ChangesServiceError,
            models::{ChangeRequest, ChangeResolution},
            records::{ChangeItemRecord, ChangeItemUuid},
            repository::PgChangeItemsRepository,
        },
        members::records::MemberUuid,
        orders::{
            records::OrderDetailRecord,
            repositories::{PgOrderDetailsRepository, PgOrdersRepository},
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgChangesService {
    db: Db,
    changes: PgChangeItemsRepository,
    orders: PgOrdersRepository,
    details: PgOrderDetailsRepository,
}

impl PgChangesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            changes: PgChangeItemsRepository::new(),
            orders: PgOrdersRepository::new(),
            details: PgOrderDetailsRepository::new(),
        }
    }
}

#[async_trait]
impl ChangesService for PgChangesService {
    #[tracing::instrument(
        name = "changes.service.request_change",
        skip(self, request),
        fields(member_uuid = %member, order_detail_uuid = %request.order_detail_uuid, kind = %request.kind),
        err
    )]
    async fn request_change(
        &self,
        member: MemberUuid,
        request: NewChangeRequest,
    ) -> Result<ChangeItemRecord, ChangesServiceError> {
        if request.reason.trim().is_empty() {
            return Err(ChangesServiceError::Validation(
                "a reason is required".to_string(),
            ));
        }

        let mut tx = self.db.begin_transaction().await?;

        let detail = self
            .details
            .get_detail(&mut tx, request.order_detail_uuid)
            .await?;

        let order = self
            .orders
            .get_order_for_update(&mut tx, detail.order_uuid)
            .await?;

        if order.member_uuid != member {
            return Err(ChangesServiceError::Forbidden);
        }

        let detail = self
            .details
            .get_detail_for_update(&mut tx, detail.uuid)
            .await?;

        let line_status = request_change(detail.order_status, request.kind)?;

        self.details
            .set_detail_status(&mut tx, detail.uuid, line_status)
            .await?;

        let change = self.changes.create_change_item(&mut tx, &request).await?;

        tx.commit().await?;

        info!(change_item_uuid = %change.uuid, "requested change");

        Ok(change)
    }

    #[tracing::instrument(
        name = "changes.service.withdraw_change",
        skip(self),
        fields(member_uuid = %member, change_item_uuid = %change),
        err
    )]
    async fn withdraw_change(
        &self,
        member: MemberUuid,
        change: ChangeItemUuid,
    ) -> Result<OrderDetailRecord, ChangesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self
            .changes
            .get_change_item_for_update(&mut tx, change)
            .await?;

        let detail = self
            .details
            .get_detail(&mut tx, current.order_detail_uuid)
            .await?;

        let order = self
            .orders
            .get_order_for_update(&mut tx, detail.order_uuid)
            .await?;

        if order.member_uuid != member {
            return Err(ChangesServiceError::Forbidden);
        }

        current.approval_status.ensure_withdrawable()?;

        let detail = self
            .details
            .get_detail_for_update(&mut tx, detail.uuid)
            .await?;

        let reverted = withdraw_change(detail.order_status, current.kind);

        let detail = if reverted == detail.order_status {
            detail
        } else {
            self.details
                .set_detail_status(&mut tx, detail.uuid, reverted)
                .await?
        };

        if self
            .changes
            .delete_pending_change_item(&mut tx, change)
            .await?
            == 0
        {
            return Err(TransitionError::new(
                "change request",
                current.approval_status.as_str(),
                "withdraw",
            )
            .into());
        }

        tx.commit().await?;

        info!(line_status = %detail.order_status, "withdrew change");

        Ok(detail)
    }

    #[tracing::instrument(
        name = "changes.service.resolve_change",
        skip(self),
        fields(change_item_uuid = %change),
        err
    )]
    async fn resolve_change(
        &self,
        change: ChangeItemUuid,
        decision: Decision,
    ) -> Result<ChangeResolution, ChangesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let current = self
            .changes
            .get_change_item_for_update(&mut tx, change)
            .await?;

        let approval_status = current.approval_status.resolve(decision)?;

        let detail = self
            .details
            .get_detail(&mut tx, current.order_detail_uuid)
            .await?;

        let order = self
            .orders
            .get_order_for_update(&mut tx, detail.order_uuid)
            .await?;

        let resolved = self
            .changes
            .resolve_change_item(&mut tx, change, approval_status)
            .await?
            .ok_or(TransitionError::new(
                "change request",
                current.approval_status.as_str(),
                "resolve",
            ))?;

        let mut delivery_status = order.delivery_status;
        let mut order_canceled = false;

        let line = match resolved_line_status(current.kind, decision) {
            Some(line_status) => {
                let line = self
                    .details
                    .set_detail_status(&mut tx, detail.uuid, line_status)
                    .await?;

                let siblings: Vec<LineStatus> = self
                    .details
                    .list_details_for_update(&mut tx, order.uuid)
                    .await?
                    .into_iter()
                    .map(|sibling| sibling.order_status)
                    .collect();

                if let Some(aggregated) = aggregate_delivery_status(delivery_status, &siblings) {
                    delivery_status = self
                        .orders
                        .set_delivery_status(&mut tx, order.uuid, aggregated)
                        .await?
                        .delivery_status;

                    order_canceled = true;
                }

                line
            }
            None => detail,
        };

        tx.commit().await?;

        info!(
            kind = %resolved.kind,
            approval_status = %resolved.approval_status,
            line_status = %line.order_status,
            order_canceled,
            "resolved change"
        );

        Ok(ChangeResolution {
            change: resolved,
            line,
            delivery_status,
            order_canceled,
        })
    }

    async fn list_member_changes(
        &self,
        member: MemberUuid,
    ) -> Result<Vec<ChangeRequest>, ChangesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let changes = self.changes.list_member_changes(&mut tx, member).await?;

        tx.commit().await?;

        Ok(changes)
    }

    async fn list_pending_changes(&self) -> Result<Vec<ChangeRequest>, ChangesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let changes = self.changes.list_pending_changes(&mut tx).await?;

        tx.commit().await?;

        Ok(changes)
    }
}

#[automock]
#[async_trait]
pub trait ChangesService: Send + Sync {
    /// Open an exchange or return request against one of the member's
    /// `ordered` lines.
    async fn request_change(
        &self,
        member: MemberUuid,
        request: NewChangeRequest,
    ) -> Result<ChangeItemRecord, ChangesServiceError>;

    /// Withdraw a pending request and put the line back to `ordered`.
    async fn withdraw_change(
        &self,
        member: MemberUuid,
        change: ChangeItemUuid,
    ) -> Result<OrderDetailRecord, ChangesServiceError>;

    /// Approve or reject a pending request, exactly once.
    ///
    /// An approved return cancels the line and, when it was the last live
    /// line, the whole order.
    async fn resolve_change(
        &self,
        change: ChangeItemUuid,
        decision: Decision,
    ) -> Result<ChangeResolution, ChangesServiceError>;

    /// The member's requests, newest first.
    async fn list_member_changes(
        &self,
        member: MemberUuid,
    ) -> Result<Vec<ChangeRequest>, ChangesServiceError>;

    /// Requests awaiting a decision, oldest first.
    async fn list_pending_changes(&self) -> Result<Vec<ChangeRequest>, ChangesServiceError>;
}
