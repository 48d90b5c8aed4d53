//! Product Options Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::catalog::{
    models::{OptionGroup, ProductOptions},
    records::{OptionCombinationRecord, OptionValueRecord, ProductRecord},
};

use crate::{
    catalog::{errors::into_status_error, models::stock_status_name},
    extensions::*,
    state::State,
};

/// Product Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    pub uuid: Uuid,
    pub name: String,

    /// List price
    pub base_price: u64,

    /// Fixed sale price, when set
    pub discount_price: Option<u64>,

    /// Percentage discount, when set
    pub discount_per: Option<u32>,

    /// One of `out_of_stock`, `orderable`, `partially_orderable`
    pub stock_status: String,

    pub available: bool,
}

impl From<ProductRecord> for ProductResponse {
    fn from(product: ProductRecord) -> Self {
        Self {
            uuid: product.uuid.into_uuid(),
            name: product.name,
            base_price: product.base_price,
            discount_price: product.discount_price,
            discount_per: product.discount_per,
            stock_status: stock_status_name(product.stock_status).to_string(),
            available: product.available,
        }
    }
}

/// Option Value Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OptionValueResponse {
    pub uuid: Uuid,
    pub name: String,
    pub price_adjustment: i64,
    pub in_stock: bool,
}

impl From<OptionValueRecord> for OptionValueResponse {
    fn from(value: OptionValueRecord) -> Self {
        Self {
            uuid: value.uuid.into_uuid(),
            name: value.name,
            price_adjustment: value.price_adjustment,
            in_stock: value.in_stock,
        }
    }
}

/// Option Type Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OptionTypeResponse {
    pub uuid: Uuid,
    pub name: String,
    pub required: bool,
    pub values: Vec<OptionValueResponse>,
}

impl From<OptionGroup> for OptionTypeResponse {
    fn from(group: OptionGroup) -> Self {
        Self {
            uuid: group.option_type.uuid.into_uuid(),
            name: group.option_type.name,
            required: group.option_type.required,
            values: group.values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Option Combination Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CombinationResponse {
    pub uuid: Uuid,
    pub name: String,
    pub value_uuids: Vec<Uuid>,
    pub in_stock: bool,
}

impl From<OptionCombinationRecord> for CombinationResponse {
    fn from(combination: OptionCombinationRecord) -> Self {
        Self {
            uuid: combination.uuid.into_uuid(),
            name: combination.name,
            value_uuids: combination
                .value_uuids
                .into_iter()
                .map(|uuid| uuid.into_uuid())
                .collect(),
            in_stock: combination.in_stock,
        }
    }
}

/// Product Options Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductOptionsResponse {
    pub product: ProductResponse,
    pub option_types: Vec<OptionTypeResponse>,
    pub combinations: Vec<CombinationResponse>,
}

impl From<ProductOptions> for ProductOptionsResponse {
    fn from(options: ProductOptions) -> Self {
        Self {
            product: options.product.into(),
            option_types: options.option_types.into_iter().map(Into::into).collect(),
            combinations: options.combinations.into_iter().map(Into::into).collect(),
        }
    }
}

/// Product Options Handler
///
/// Returns a product's live option types and values in display order.
#[endpoint(
    tags("catalog"),
    summary = "Get Product Options",
    responses(
        (status_code = StatusCode::OK, description = "Product options"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProductOptionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let options = state
        .app
        .catalog
        .get_options(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(options.into()))
}
