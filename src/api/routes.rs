//! API route configuration.

use crate::api::handlers::{
    admin_distributor_list_handler, bulk_update_distributors_handler,
    bulk_update_enterprises_handler, cart_handler, create_distributor_handler,
    create_enterprise_handler, create_product_handler, create_supplier_handler,
    delete_distributor_handler, delete_enterprise_handler, delete_supplier_handler,
    deselect_distributor_handler, distributor_handler, distributor_list_handler,
    distributor_products_handler, empty_cart_handler, enterprise_handler,
    enterprise_list_handler, populate_handler, product_handler, product_list_handler,
    select_distributor_handler, supplier_handler, supplier_list_handler,
    update_distributor_handler, update_enterprise_handler, update_product_distributors_handler,
    update_supplier_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post, put},
};

/// Storefront routes: cart and catalog browsing.
///
/// # Endpoints
///
/// - `GET    /cart`                       - Current cart
/// - `DELETE /cart`                       - Empty the cart
/// - `PUT    /orders/populate`            - Add products through a distributor
/// - `GET    /distributors`               - Active distributors
/// - `GET    /distributors/deselect`      - Clear the cart's distributor
/// - `GET    /distributors/{id}`          - Distributor details
/// - `GET    /distributors/{id}/select`   - Choose the cart's distributor
/// - `GET    /distributors/{id}/products` - Products a distributor carries
/// - `GET    /suppliers`, `/suppliers/{id}`
/// - `GET    /products`, `/products/{id}`
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart_handler).delete(empty_cart_handler))
        .route("/orders/populate", put(populate_handler))
        .route("/distributors", get(distributor_list_handler))
        .route("/distributors/deselect", get(deselect_distributor_handler))
        .route("/distributors/{id}", get(distributor_handler))
        .route("/distributors/{id}/select", get(select_distributor_handler))
        .route(
            "/distributors/{id}/products",
            get(distributor_products_handler),
        )
        .route("/suppliers", get(supplier_list_handler))
        .route("/suppliers/{id}", get(supplier_handler))
        .route("/products", get(product_list_handler))
        .route("/products/{id}", get(product_handler))
}

/// Catalog administration, mounted under `/admin`.
///
/// # Endpoints
///
/// - `GET/POST          /enterprises`
/// - `POST              /enterprises/bulk_update`
/// - `GET/PATCH/DELETE  /enterprises/{id}`
/// - `GET/POST          /distributors`
/// - `POST              /distributors/bulk_update`
/// - `GET/PATCH/DELETE  /distributors/{id}`
/// - `GET/POST          /suppliers`
/// - `GET/PATCH/DELETE  /suppliers/{id}`
/// - `POST              /products`
/// - `PUT               /products/{id}/distributors`
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/enterprises",
            get(enterprise_list_handler).post(create_enterprise_handler),
        )
        .route(
            "/enterprises/bulk_update",
            post(bulk_update_enterprises_handler),
        )
        .route(
            "/enterprises/{id}",
            get(enterprise_handler)
                .patch(update_enterprise_handler)
                .delete(delete_enterprise_handler),
        )
        .route(
            "/distributors",
            get(admin_distributor_list_handler).post(create_distributor_handler),
        )
        .route(
            "/distributors/bulk_update",
            post(bulk_update_distributors_handler),
        )
        .route(
            "/distributors/{id}",
            get(distributor_handler)
                .patch(update_distributor_handler)
                .delete(delete_distributor_handler),
        )
        .route(
            "/suppliers",
            get(supplier_list_handler).post(create_supplier_handler),
        )
        .route(
            "/suppliers/{id}",
            get(supplier_handler)
                .patch(update_supplier_handler)
                .delete(delete_supplier_handler),
        )
        .route("/products", post(create_product_handler))
        .route(
            "/products/{id}/distributors",
            put(update_product_distributors_handler),
        )
}
