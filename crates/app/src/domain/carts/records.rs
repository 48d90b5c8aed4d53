//! Cart Records

use jiff::Timestamp;
use storefront::selection::OptionSelection;

use crate::{
    domain::{catalog::records::ProductUuid, members::records::MemberUuid},
    uuids::TypedUuid,
};

/// Cart Line UUID
pub type CartLineUuid = TypedUuid<CartLineRecord>;

/// Cart Line Record
///
/// Prices are a snapshot taken when the line was added or last repriced.
#[derive(Debug, Clone)]
pub struct CartLineRecord {
    pub uuid: CartLineUuid,
    pub member_uuid: MemberUuid,
    pub product_uuid: ProductUuid,
    pub selection: OptionSelection,
    pub quantity: u32,
    pub base_price: u64,
    pub option_price: i64,
    pub unit_price: u64,
    pub checked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartLineRecord {
    /// Snapshot unit price times quantity, `None` if it does not fit.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price.checked_mul(u64::from(self.quantity))
    }
}

