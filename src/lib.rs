//! Storefront
//!
//! Pure order-lifecycle rules for a storefront: option catalogs, line pricing,
//! order totals, and the order, payment and change-request state machines.

pub mod catalog;
pub mod changes;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod orders;
pub mod payments;
pub mod prelude;
pub mod pricing;
pub mod selection;
pub mod transition;
