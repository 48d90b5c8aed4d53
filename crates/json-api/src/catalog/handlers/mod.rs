//! Catalog Handlers

pub(crate) mod options;
pub(crate) mod quote;
