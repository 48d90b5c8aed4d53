//! Cart Handlers

pub(crate) mod add_line;
pub(crate) mod checked;
pub(crate) mod get;
pub(crate) mod quantity;
pub(crate) mod remove_line;
pub(crate) mod reprice;
pub(crate) mod toggle;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::prelude::*;
    use storefront_app::{context::AppContext, domain::carts::MockCartsService};

    use crate::test_helpers::{app_context, member_service};

    pub(super) fn carts_service(carts: MockCartsService, route: Router) -> Service {
        member_service(
            AppContext {
                carts: Arc::new(carts),
                ..app_context()
            },
            route,
        )
    }
}
