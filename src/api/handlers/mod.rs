//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cart;
pub mod distributors;
pub mod enterprises;
pub mod health;
pub mod products;
pub mod suppliers;

pub use cart::{
    cart_handler, deselect_distributor_handler, empty_cart_handler, populate_handler,
    select_distributor_handler,
};
pub use distributors::{
    admin_distributor_list_handler, bulk_update_distributors_handler, create_distributor_handler,
    delete_distributor_handler, distributor_handler, distributor_list_handler,
    distributor_products_handler, update_distributor_handler,
};
pub use enterprises::{
    bulk_update_enterprises_handler, create_enterprise_handler, delete_enterprise_handler,
    enterprise_handler, enterprise_list_handler, update_enterprise_handler,
};
pub use health::health_handler;
pub use products::{
    create_product_handler, product_handler, product_list_handler,
    update_product_distributors_handler,
};
pub use suppliers::{
    create_supplier_handler, delete_supplier_handler, supplier_handler, supplier_list_handler,
    update_supplier_handler,
};
