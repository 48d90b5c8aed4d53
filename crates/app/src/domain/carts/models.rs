//! Cart Models

use crate::domain::{carts::records::CartLineRecord, members::records::MemberUuid};

/// Cart Model
#[derive(Debug, Clone)]
pub struct Cart {
    pub member_uuid: MemberUuid,
    pub lines: Vec<CartLineRecord>,
}

impl Cart {
    /// Sum of line totals of checked lines, `None` on overflow.
    pub fn checked_subtotal(&self) -> Option<u64> {
        self.lines
            .iter()
            .filter(|line| line.checked)
            .try_fold(0_u64, |total, line| total.checked_add(line.line_total()?))
    }

    /// Number of checked lines.
    pub fn checked_count(&self) -> usize {
        self.lines.iter().filter(|line| line.checked).count()
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use storefront::selection::OptionSelection;

    use crate::domain::{carts::records::CartLineUuid, catalog::records::ProductUuid};

    use super::*;

    fn line(unit_price: u64, quantity: u32, checked: bool) -> CartLineRecord {
        CartLineRecord {
            uuid: CartLineUuid::new(),
            member_uuid: MemberUuid::new(),
            product_uuid: ProductUuid::new(),
            selection: OptionSelection::None,
            quantity,
            base_price: unit_price,
            option_price: 0,
            unit_price,
            checked,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn subtotal_skips_unchecked_lines() {
        let cart = Cart {
            member_uuid: MemberUuid::new(),
            lines: vec![line(1_000, 3, true), line(5_000, 1, false)],
        };

        assert_eq!(cart.checked_subtotal(), Some(3_000));
        assert_eq!(cart.checked_count(), 1);
    }

    #[test]
    fn overflowing_line_total_is_reported_not_clamped() {
        let huge = line(u64::MAX / 2, 3, true);

        assert_eq!(huge.line_total(), None);

        let cart = Cart {
            member_uuid: MemberUuid::new(),
            lines: vec![line(u64::MAX / 2, 1, true), line(u64::MAX / 2, 1, true), line(2, 1, true)],
        };

        assert_eq!(cart.checked_subtotal(), None);
    }
}
