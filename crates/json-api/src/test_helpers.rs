//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use storefront::{
    catalog::StockStatus,
    changes::{ApprovalStatus, ChangeKind},
    orders::{DeliveryStatus, LineStatus, OrderNumber},
    payments::{PaymentMethod, PaymentStatus},
    selection::OptionSelection,
};
use storefront_app::{
    context::AppContext,
    domain::{
        carts::{MockCartsService, records::{CartLineRecord, CartLineUuid}},
        catalog::{MockCatalogService, records::{ProductRecord, ProductUuid}},
        changes::{
            MockChangesService,
            models::ChangeRequest,
            records::{ChangeItemRecord, ChangeItemUuid},
        },
        members::{MockMembersService, records::MemberUuid},
        orders::{
            MockOrdersService,
            data::Recipient,
            models::{Order, OrderLine},
            records::{
                OrderDetailRecord, OrderDetailUuid, OrderRecord, OrderUuid, PaymentRecord,
                PaymentUuid,
            },
        },
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_MEMBER_UUID: MemberUuid = MemberUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_member(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_member_uuid(TEST_MEMBER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// Context whose services fail the test if called.
pub(crate) fn app_context() -> AppContext {
    AppContext {
        catalog: Arc::new(MockCatalogService::new()),
        carts: Arc::new(MockCartsService::new()),
        orders: Arc::new(MockOrdersService::new()),
        changes: Arc::new(MockChangesService::new()),
        members: Arc::new(MockMembersService::new()),
    }
}

/// Serve `route` as the test member.
pub(crate) fn member_service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .hoop(inject_member)
            .push(route),
    )
}

/// Serve `route` without a member identity, as admin and gateway routes are.
pub(crate) fn service(app: AppContext, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::from_app_context(app)))
            .push(route),
    )
}

pub(crate) fn make_product(uuid: ProductUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        name: "Linen Shirt".to_string(),
        base_price: 10_000,
        discount_price: None,
        discount_per: None,
        stock_status: StockStatus::Orderable,
        available: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_cart_line(uuid: CartLineUuid) -> CartLineRecord {
    CartLineRecord {
        uuid,
        member_uuid: TEST_MEMBER_UUID,
        product_uuid: ProductUuid::new(),
        selection: OptionSelection::None,
        quantity: 2,
        base_price: 10_000,
        option_price: 2_000,
        unit_price: 12_000,
        checked: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_recipient() -> Recipient {
    Recipient {
        name: "Kim Minji".to_string(),
        phone: "010-1234-5678".to_string(),
        postal_code: "04524".to_string(),
        address: "110 Sejong-daero".to_string(),
        address_detail: "Unit 1203".to_string(),
        delivery_message: None,
    }
}

pub(crate) fn make_order_record(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        order_number: OrderNumber::from_uuid(uuid.into_uuid()),
        member_uuid: TEST_MEMBER_UUID,
        recipient: make_recipient(),
        total_price: 24_000,
        discount_price: 0,
        delivery_price: 3_000,
        mileage_used: 0,
        final_price: 27_000,
        delivery_status: DeliveryStatus::PaymentPending,
        carrier: None,
        tracking_number: None,
        paid_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_detail(uuid: OrderDetailUuid, order: OrderUuid) -> OrderDetailRecord {
    OrderDetailRecord {
        uuid,
        order_uuid: order,
        product_uuid: ProductUuid::new(),
        product_name: "Linen Shirt".to_string(),
        selection: OptionSelection::None,
        quantity: 2,
        base_price: 10_000,
        option_price: 2_000,
        unit_price: 12_000,
        order_status: LineStatus::Ordered,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(uuid: OrderUuid) -> Order {
    Order {
        order: make_order_record(uuid),
        lines: vec![OrderLine {
            detail: make_detail(OrderDetailUuid::new(), uuid),
            option_names: vec!["Large".to_string()],
            combination_name: None,
        }],
        payment: PaymentRecord {
            uuid: PaymentUuid::new(),
            order_uuid: uuid,
            method: PaymentMethod::Card,
            amount: 27_000,
            status: PaymentStatus::Pending,
            gateway_key: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
    }
}

pub(crate) fn make_change(uuid: ChangeItemUuid, detail: OrderDetailUuid) -> ChangeItemRecord {
    ChangeItemRecord {
        uuid,
        order_detail_uuid: detail,
        kind: ChangeKind::Return,
        reason: "Did not fit".to_string(),
        approval_status: ApprovalStatus::Pending,
        resolved_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_change_request(uuid: ChangeItemUuid) -> ChangeRequest {
    let order = OrderUuid::new();

    ChangeRequest {
        change: make_change(uuid, OrderDetailUuid::new()),
        order_uuid: order,
        order_number: OrderNumber::from_uuid(order.into_uuid()),
        member_uuid: TEST_MEMBER_UUID,
        product_name: "Linen Shirt".to_string(),
        quantity: 2,
        line_status: LineStatus::ReturnRequested,
    }
}
