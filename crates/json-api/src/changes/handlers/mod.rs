//! Change Request Handlers

pub(crate) mod index;
pub(crate) mod pending;
pub(crate) mod request;
pub(crate) mod resolve;
pub(crate) mod withdraw;
