//! Order Handlers

pub(crate) mod cancel;
pub(crate) mod confirm_payment;
pub(crate) mod create;
pub(crate) mod delivery;
pub(crate) mod get;
pub(crate) mod index;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use salvo::prelude::*;
    use storefront_app::{context::AppContext, domain::orders::MockOrdersService};

    use crate::test_helpers::{app_context, member_service, service};

    pub(super) fn orders_context(orders: MockOrdersService) -> AppContext {
        AppContext {
            orders: Arc::new(orders),
            ..app_context()
        }
    }

    pub(super) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
        member_service(orders_context(orders), route)
    }

    pub(super) fn anonymous_orders_service(orders: MockOrdersService, route: Router) -> Service {
        service(orders_context(orders), route)
    }
}
