//! App Router

use salvo::Router;

use crate::{auth, carts, catalog, changes, orders};

/// Customer, admin and payment gateway routes.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(customer_router())
        .push(admin_router())
        .push(Router::with_path("payments/{order}/confirm").post(orders::confirm_payment::handler))
}

fn customer_router() -> Router {
    Router::new()
        .hoop(auth::middleware::member)
        .push(
            Router::with_path("products/{product}")
                .push(Router::with_path("options").get(catalog::options::handler))
                .push(Router::with_path("quote").post(catalog::quote::handler)),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("checked").put(carts::checked::handler))
                .push(
                    Router::with_path("lines")
                        .post(carts::add_line::handler)
                        .delete(carts::remove_line::handler)
                        .push(
                            Router::with_path("{line}")
                                .push(Router::with_path("quantity").put(carts::quantity::handler))
                                .push(Router::with_path("toggle").post(carts::toggle::handler))
                                .push(Router::with_path("reprice").post(carts::reprice::handler)),
                        ),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler)),
                ),
        )
        .push(
            Router::with_path("changes")
                .get(changes::index::handler)
                .post(changes::request::handler)
                .push(Router::with_path("{change}").delete(changes::withdraw::handler)),
        )
}

fn admin_router() -> Router {
    Router::with_path("admin")
        .hoop(auth::middleware::admin)
        .push(
            Router::with_path("changes")
                .get(changes::pending::handler)
                .push(Router::with_path("{change}").put(changes::resolve::handler)),
        )
        .push(Router::with_path("orders/delivery").put(orders::delivery::handler))
}
