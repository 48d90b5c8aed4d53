//! Storefront Domain Concerns

pub mod carts;
pub mod catalog;
pub mod changes;
pub mod members;
pub mod orders;
