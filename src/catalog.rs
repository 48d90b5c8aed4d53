//! Catalog
//!
//! Read-only snapshots of a product and its options. Every row carries its own
//! soft-delete marker; the [`Active`] predicate is the only place that marker is
//! interpreted, so pricing and selection never disagree about what is live.

use std::cmp::Ordering;

use smallvec::SmallVec;
use uuid::Uuid;

use crate::selection::OptionSelection;

/// Rows that can be soft-deleted.
pub trait Active {
    /// Whether the row is live for selection and pricing.
    fn is_active(&self) -> bool;
}

/// Product stock status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StockStatus {
    /// Nothing can be ordered.
    OutOfStock,

    /// Fully orderable.
    Orderable,

    /// Some variants can be ordered.
    PartiallyOrderable,
}

impl StockStatus {
    /// Storage code.
    pub const fn code(self) -> i16 {
        match self {
            Self::OutOfStock => 0,
            Self::Orderable => 1,
            Self::PartiallyOrderable => 2,
        }
    }

    /// Parse a storage code.
    pub const fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::OutOfStock),
            1 => Some(Self::Orderable),
            2 => Some(Self::PartiallyOrderable),
            _ => None,
        }
    }

    /// Any status above out-of-stock accepts orders.
    pub const fn is_orderable(self) -> bool {
        self.code() > 0
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Product identifier.
    pub uuid: Uuid,

    /// Display name.
    pub name: String,

    /// List price before any discount.
    pub base_price: u64,

    /// Absolute sale price; wins over the percentage when set and non-zero.
    pub discount_price: Option<u64>,

    /// Percentage discount applied to the base price.
    pub discount_per: Option<u32>,

    /// Stock status.
    pub stock_status: StockStatus,

    /// Whether the product is offered for sale.
    pub available: bool,

    /// Soft-delete marker.
    pub deleted: bool,
}

impl Product {
    /// Whether an order for this product may be placed right now.
    pub fn is_orderable(&self) -> bool {
        self.stock_status.is_orderable() && self.available && self.is_active()
    }
}

impl Active for Product {
    fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Option Type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionType {
    /// Option type identifier.
    pub uuid: Uuid,

    /// Owning product.
    pub product_uuid: Uuid,

    /// Display name, e.g. "Size".
    pub name: String,

    /// Whether a value of this type must be chosen.
    pub required: bool,

    /// Display order.
    pub sort_order: i32,

    /// Soft-delete marker.
    pub deleted: bool,
}

impl Active for OptionType {
    fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Option Value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionValue {
    /// Option value identifier.
    pub uuid: Uuid,

    /// Owning option type.
    pub option_type_uuid: Uuid,

    /// Product owning the option type.
    pub product_uuid: Uuid,

    /// Display name, e.g. "Large".
    pub name: String,

    /// Signed amount added to the product's resolved price.
    pub price_adjustment: i64,

    /// Display order.
    pub sort_order: i32,

    /// Per-value stock flag.
    pub in_stock: bool,

    /// Soft-delete marker.
    pub deleted: bool,
}

impl Active for OptionValue {
    fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Option Combination
///
/// A named set of values that must be selected together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCombination {
    /// Combination identifier.
    pub uuid: Uuid,

    /// Owning product.
    pub product_uuid: Uuid,

    /// Display name.
    pub name: String,

    /// Member option values.
    pub value_uuids: SmallVec<[Uuid; 4]>,

    /// Combination stock flag.
    pub in_stock: bool,

    /// Soft-delete marker.
    pub deleted: bool,
}

impl Active for OptionCombination {
    fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// An active option type with its active values, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableOption<'a> {
    /// The option type.
    pub option_type: &'a OptionType,

    /// Its live values.
    pub values: Vec<&'a OptionValue>,
}

/// Availability of a product and selection at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Can be ordered.
    Orderable,

    /// The product is out of stock, unavailable or deleted.
    ProductUnavailable,

    /// A selected value or combination is out of stock or deleted.
    OptionUnavailable(Uuid),
}

/// Product Catalog Snapshot
///
/// Everything needed to validate and price selections for one product. Option
/// values and combinations that were explicitly requested are included even if
/// they belong to another product so that such references can be rejected
/// rather than reported as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCatalog {
    /// The product.
    pub product: Product,

    /// Option types, including soft-deleted ones.
    pub option_types: Vec<OptionType>,

    /// Option values, including soft-deleted ones.
    pub option_values: Vec<OptionValue>,

    /// Option combinations, including soft-deleted ones.
    pub combinations: Vec<OptionCombination>,
}

impl ProductCatalog {
    /// Find an option type by id.
    pub fn option_type(&self, uuid: Uuid) -> Option<&OptionType> {
        self.option_types.iter().find(|option| option.uuid == uuid)
    }

    /// Find an option value by id.
    pub fn option_value(&self, uuid: Uuid) -> Option<&OptionValue> {
        self.option_values.iter().find(|value| value.uuid == uuid)
    }

    /// Find a combination by id.
    pub fn combination(&self, uuid: Uuid) -> Option<&OptionCombination> {
        self.combinations
            .iter()
            .find(|combination| combination.uuid == uuid)
    }

    /// A value is selectable when it and its option type are both active.
    pub fn is_value_selectable(&self, value: &OptionValue) -> bool {
        value.is_active()
            && self
                .option_type(value.option_type_uuid)
                .is_some_and(Active::is_active)
    }

    /// Active option types of this product ordered by sort order, each with its
    /// active values ordered by sort order.
    pub fn selectable_options(&self) -> Vec<SelectableOption<'_>> {
        let mut option_types: Vec<&OptionType> = self
            .option_types
            .iter()
            .filter(|option| option.product_uuid == self.product.uuid && option.is_active())
            .collect();

        option_types.sort_by(|a, b| by_sort_order(a.sort_order, &a.name, b.sort_order, &b.name));

        option_types
            .into_iter()
            .map(|option_type| {
                let mut values: Vec<&OptionValue> = self
                    .option_values
                    .iter()
                    .filter(|value| value.option_type_uuid == option_type.uuid && value.is_active())
                    .collect();

                values.sort_by(|a, b| by_sort_order(a.sort_order, &a.name, b.sort_order, &b.name));

                SelectableOption {
                    option_type,
                    values,
                }
            })
            .collect()
    }

    /// Checkout availability of this product with the given selection.
    ///
    /// References that are unknown or belong to another product are left to the
    /// pricing resolver, which reports them precisely.
    pub fn availability(&self, selection: &OptionSelection) -> Availability {
        if !self.product.is_orderable() {
            return Availability::ProductUnavailable;
        }

        for uuid in selection.values() {
            let Some(value) = self.option_value(*uuid) else {
                continue;
            };

            if value.product_uuid == self.product.uuid
                && (!value.in_stock || !self.is_value_selectable(value))
            {
                return Availability::OptionUnavailable(*uuid);
            }
        }

        if let Some(uuid) = selection.combination()
            && let Some(combination) = self.combination(uuid)
            && combination.product_uuid == self.product.uuid
            && (!combination.in_stock
                || !combination.is_active()
                || !self.combination_members_available(combination))
        {
            return Availability::OptionUnavailable(uuid);
        }

        Availability::Orderable
    }

    fn combination_members_available(&self, combination: &OptionCombination) -> bool {
        combination.value_uuids.iter().all(|uuid| {
            self.option_value(*uuid)
                .is_some_and(|value| value.in_stock && self.is_value_selectable(value))
        })
    }
}

fn by_sort_order(a_order: i32, a_name: &str, b_order: i32, b_name: &str) -> Ordering {
    a_order.cmp(&b_order).then_with(|| a_name.cmp(b_name))
}
