//! Pricing
//!
//! Resolves the unit price of a product line from a catalog snapshot. The
//! resolver is pure: the same snapshot, selection and quantity always produce
//! the same [`PriceQuote`].

use rustc_hash::FxHashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    catalog::{Active, OptionValue, Product, ProductCatalog},
    selection::{OptionSelection, SelectionError},
};

/// Errors that can occur while resolving a price.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// The product does not exist or has been deleted.
    #[error("product {0} not found")]
    ProductNotFound(Uuid),

    /// An option value does not exist or has been deleted.
    #[error("option value {0} not found")]
    OptionNotFound(Uuid),

    /// An option combination does not exist or has been deleted.
    #[error("option combination {0} not found")]
    CombinationNotFound(Uuid),

    /// The option belongs to another product, or collides with another
    /// selected value of the same option type.
    #[error("option {0} cannot be selected for this product")]
    AmbiguousOption(Uuid),

    /// A required option type has no selected value.
    #[error("required option \"{0}\" was not selected")]
    MissingRequiredOption(String),

    /// The selection itself is malformed.
    #[error(transparent)]
    InvalidSelection(#[from] SelectionError),

    /// Quantity below one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Discount percentage above 100.
    #[error("discount percentage {0} is above 100")]
    InvalidDiscountRate(u32),

    /// Sale price above the list price.
    #[error("discount price {discount_price} is above base price {base_price}")]
    DiscountAboveBasePrice {
        /// Configured sale price.
        discount_price: u64,
        /// Configured list price.
        base_price: u64,
    },

    /// Adjustments took the unit price below zero.
    #[error("resolved unit price {0} is negative")]
    NegativePrice(i128),

    /// Arithmetic overflowed.
    #[error("price arithmetic overflowed")]
    Overflow,
}

impl PricingError {
    /// Whether the error points at misconfigured catalog data rather than a bad
    /// request.
    pub const fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::InvalidDiscountRate(_)
                | Self::DiscountAboveBasePrice { .. }
                | Self::NegativePrice(_)
                | Self::Overflow
        )
    }
}

/// Price Quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    /// Priced product.
    pub product_uuid: Uuid,

    /// List price before product discounts.
    pub list_price: u64,

    /// Effective base price after product discounts.
    pub base_price: u64,

    /// Sum of selected option adjustments.
    pub option_price: i64,

    /// `list_price + option_price`.
    pub list_unit_price: u64,

    /// `base_price + option_price`.
    pub unit_price: u64,

    /// Quantity priced.
    pub quantity: u32,

    /// `list_unit_price * quantity`.
    pub list_total: u64,

    /// `unit_price * quantity`.
    pub line_total: u64,
}

impl PriceQuote {
    /// Product discount over the whole line.
    pub const fn discount_total(&self) -> u64 {
        self.list_total.saturating_sub(self.line_total)
    }
}

/// Resolve the effective base price of a product.
///
/// A non-zero discount price wins; otherwise a discount percentage is applied
/// (rounding the discount down); otherwise the base price stands.
///
/// # Errors
///
/// Returns a data-integrity [`PricingError`] for a percentage above 100 or a
/// sale price above the list price.
pub fn effective_base_price(product: &Product) -> Result<u64, PricingError> {
    if let Some(discount_price) = product.discount_price.filter(|price| *price > 0) {
        if discount_price > product.base_price {
            return Err(PricingError::DiscountAboveBasePrice {
                discount_price,
                base_price: product.base_price,
            });
        }

        return Ok(discount_price);
    }

    match product.discount_per.filter(|per| *per > 0) {
        Some(per) if per > 100 => Err(PricingError::InvalidDiscountRate(per)),
        Some(per) => {
            let discount = u128::from(product.base_price) * u128::from(per) / 100;
            let discount = u64::try_from(discount).map_err(|_overflow| PricingError::Overflow)?;

            Ok(product.base_price - discount)
        }
        None => Ok(product.base_price),
    }
}

/// Resolve the price of `quantity` units of a product with the given options.
///
/// # Errors
///
/// Returns a [`PricingError`] when the product or an option cannot be priced,
/// the selection is illegal for the product, or the result is negative.
pub fn resolve_price(
    catalog: &ProductCatalog,
    selection: &OptionSelection,
    quantity: u32,
) -> Result<PriceQuote, PricingError> {
    let product = &catalog.product;

    if !product.is_active() {
        return Err(PricingError::ProductNotFound(product.uuid));
    }

    if quantity == 0 {
        return Err(PricingError::InvalidQuantity);
    }

    let base_price = effective_base_price(product)?;

    let option_price = match selection {
        OptionSelection::None => {
            ensure_required_options(catalog, &[])?;

            0
        }
        OptionSelection::Values(uuids) => {
            let values = selected_values(catalog, uuids)?;

            ensure_required_options(catalog, &values)?;

            sum_adjustments(&values)?
        }
        OptionSelection::Combination(uuid) => combination_adjustment(catalog, *uuid)?,
    };

    let list_unit_price = apply_adjustment(product.base_price, option_price)?;
    let unit_price = apply_adjustment(base_price, option_price)?;

    let list_total = list_unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    let line_total = unit_price
        .checked_mul(u64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(PriceQuote {
        product_uuid: product.uuid,
        list_price: product.base_price,
        base_price,
        option_price,
        list_unit_price,
        unit_price,
        quantity,
        list_total,
        line_total,
    })
}

fn selected_values<'a>(
    catalog: &'a ProductCatalog,
    uuids: &[Uuid],
) -> Result<Vec<&'a OptionValue>, PricingError> {
    let mut seen_types = FxHashSet::default();

    uuids
        .iter()
        .map(|uuid| {
            let value = catalog
                .option_value(*uuid)
                .ok_or(PricingError::OptionNotFound(*uuid))?;

            if value.product_uuid != catalog.product.uuid {
                return Err(PricingError::AmbiguousOption(*uuid));
            }

            if !catalog.is_value_selectable(value) {
                return Err(PricingError::OptionNotFound(*uuid));
            }

            if !seen_types.insert(value.option_type_uuid) {
                return Err(PricingError::AmbiguousOption(*uuid));
            }

            Ok(value)
        })
        .collect()
}

fn ensure_required_options(
    catalog: &ProductCatalog,
    values: &[&OptionValue],
) -> Result<(), PricingError> {
    let missing = catalog.selectable_options().into_iter().find(|option| {
        option.option_type.required
            && !values
                .iter()
                .any(|value| value.option_type_uuid == option.option_type.uuid)
    });

    match missing {
        Some(option) => Err(PricingError::MissingRequiredOption(
            option.option_type.name.clone(),
        )),
        None => Ok(()),
    }
}

fn combination_adjustment(catalog: &ProductCatalog, uuid: Uuid) -> Result<i64, PricingError> {
    let combination = catalog
        .combination(uuid)
        .ok_or(PricingError::CombinationNotFound(uuid))?;

    if combination.product_uuid != catalog.product.uuid {
        return Err(PricingError::AmbiguousOption(uuid));
    }

    if !combination.is_active() {
        return Err(PricingError::CombinationNotFound(uuid));
    }

    let values = combination
        .value_uuids
        .iter()
        .map(|value_uuid| {
            let value = catalog
                .option_value(*value_uuid)
                .filter(|value| value.product_uuid == catalog.product.uuid)
                .ok_or(PricingError::AmbiguousOption(*value_uuid))?;

            // A combination is only as live as every value it bundles.
            if catalog.is_value_selectable(value) {
                Ok(value)
            } else {
                Err(PricingError::CombinationNotFound(uuid))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    sum_adjustments(&values)
}

fn sum_adjustments(values: &[&OptionValue]) -> Result<i64, PricingError> {
    values.iter().try_fold(0_i64, |sum, value| {
        sum.checked_add(value.price_adjustment)
            .ok_or(PricingError::Overflow)
    })
}

fn apply_adjustment(price: u64, adjustment: i64) -> Result<u64, PricingError> {
    let adjusted = i128::from(price) + i128::from(adjustment);

    if adjusted < 0 {
        return Err(PricingError::NegativePrice(adjusted));
    }

    u64::try_from(adjusted).map_err(|_overflow| PricingError::Overflow)
}
