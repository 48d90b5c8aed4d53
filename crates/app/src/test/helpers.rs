//! Test Helpers

use storefront::{
    catalog::StockStatus,
    changes::ChangeKind,
    orders::{DeclaredTotals, DeliveryFeePolicy},
    payments::PaymentMethod,
    pricing::PricingError,
    selection::{OptionSelection, SelectionError},
};
use uuid::Uuid;

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, data::NewCartLine, records::CartLineRecord},
        catalog::{
            CatalogService, CatalogServiceError,
            data::{NewOptionType, NewOptionValue, NewProduct},
            records::{
                OptionTypeRecord, OptionTypeUuid, OptionValueRecord, OptionValueUuid,
                ProductRecord, ProductUuid,
            },
        },
        changes::{
            ChangesService, ChangesServiceError,
            data::NewChangeRequest,
            records::{ChangeItemRecord, ChangeItemUuid},
        },
        members::{
            MembersService, MembersServiceError,
            data::NewMember,
            records::{MemberRecord, MemberUuid},
        },
        orders::{
            OrdersService, OrdersServiceError,
            data::{NewOrder, NewOrderLine, Recipient},
            models::Order,
            records::{OrderDetailUuid, OrderUuid},
        },
    },
    test::TestContext,
};

pub(crate) async fn create_member(
    ctx: &TestContext,
    mileage: u64,
) -> Result<MemberRecord, MembersServiceError> {
    ctx.members
        .create_member(NewMember {
            uuid: MemberUuid::new(),
            name: "Test Member".to_string(),
            mileage,
        })
        .await
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    base_price: u64,
) -> Result<ProductRecord, CatalogServiceError> {
    create_product_with_stock(ctx, base_price, StockStatus::Orderable).await
}

pub(crate) async fn create_product_with_stock(
    ctx: &TestContext,
    base_price: u64,
    stock_status: StockStatus,
) -> Result<ProductRecord, CatalogServiceError> {
    let uuid = ProductUuid::new();

    ctx.catalog
        .create_product(NewProduct {
            uuid,
            name: format!("Product {uuid}"),
            base_price,
            discount_price: None,
            discount_per: None,
            stock_status,
            available: true,
        })
        .await
}

/// Create an option type with one value per `(name, adjustment)` pair.
pub(crate) async fn create_option(
    ctx: &TestContext,
    product: ProductUuid,
    name: &str,
    required: bool,
    sort_order: i32,
    values: &[(&str, i64)],
) -> Result<(OptionTypeRecord, Vec<OptionValueRecord>), CatalogServiceError> {
    let option_type = ctx
        .catalog
        .create_option_type(NewOptionType {
            uuid: OptionTypeUuid::new(),
            product_uuid: product,
            name: name.to_string(),
            required,
            sort_order,
        })
        .await?;

    let mut created = Vec::with_capacity(values.len());

    for (position, (value_name, price_adjustment)) in (0_i32..).zip(values) {
        created.push(
            ctx.catalog
                .create_option_value(NewOptionValue {
                    uuid: OptionValueUuid::new(),
                    option_type_uuid: option_type.uuid,
                    name: (*value_name).to_string(),
                    price_adjustment: *price_adjustment,
                    sort_order: position,
                    in_stock: true,
                })
                .await?,
        );
    }

    Ok((option_type, created))
}

pub(crate) async fn add_line(
    ctx: &TestContext,
    member: MemberUuid,
    product: ProductUuid,
    values: &[Uuid],
    quantity: u32,
) -> Result<CartLineRecord, CartsServiceError> {
    let selection =
        OptionSelection::from_parts(values.iter().copied(), None).map_err(PricingError::from)?;

    ctx.carts
        .add_line(
            member,
            NewCartLine {
                product_uuid: product,
                selection,
                quantity,
            },
        )
        .await
}

pub(crate) fn recipient() -> Recipient {
    Recipient {
        name: "Kim Minji".to_string(),
        phone: "010-1234-5678".to_string(),
        postal_code: "04524".to_string(),
        address: "110 Sejong-daero, Jung-gu, Seoul".to_string(),
        address_detail: "Unit 1203".to_string(),
        delivery_message: Some("Leave at the door".to_string()),
    }
}

pub(crate) fn order_line(
    product: ProductUuid,
    values: &[Uuid],
    quantity: u32,
    declared_base_price: u64,
    declared_option_price: i64,
) -> Result<NewOrderLine, SelectionError> {
    Ok(NewOrderLine {
        product_uuid: product,
        selection: OptionSelection::from_parts(values.iter().copied(), None)?,
        quantity,
        declared_base_price,
        declared_option_price,
    })
}

pub(crate) fn new_order(
    lines: Vec<NewOrderLine>,
    declared: DeclaredTotals,
    mileage: u64,
) -> NewOrder {
    NewOrder {
        uuid: OrderUuid::new(),
        recipient: recipient(),
        lines,
        payment_method: PaymentMethod::Card,
        declared,
        mileage,
    }
}

/// Order one of each product, without options, discounts or mileage.
pub(crate) async fn place_order(
    ctx: &TestContext,
    member: MemberUuid,
    products: &[&ProductRecord],
) -> Result<Order, OrdersServiceError> {
    let lines: Vec<NewOrderLine> = products
        .iter()
        .map(|product| NewOrderLine {
            product_uuid: product.uuid,
            selection: OptionSelection::None,
            quantity: 1,
            declared_base_price: product.base_price,
            declared_option_price: 0,
        })
        .collect();

    let total_price: u64 = products.iter().map(|product| product.base_price).sum();
    let delivery_price = DeliveryFeePolicy::default().fee_for(total_price);

    ctx.orders
        .create_order(
            member,
            new_order(
                lines,
                DeclaredTotals {
                    total_price,
                    discount_price: 0,
                    delivery_price,
                    final_price: total_price + delivery_price,
                },
                0,
            ),
        )
        .await
}

pub(crate) async fn request_change(
    ctx: &TestContext,
    member: MemberUuid,
    detail: OrderDetailUuid,
    kind: ChangeKind,
) -> Result<ChangeItemRecord, ChangesServiceError> {
    ctx.changes
        .request_change(
            member,
            NewChangeRequest {
                uuid: ChangeItemUuid::new(),
                order_detail_uuid: detail,
                kind,
                reason: "Did not fit".to_string(),
            },
        )
        .await
}
