//! Application layer services implementing business logic.
//!
//! Services validate input, coordinate repository calls and run the cart
//! admission guard. They consume repository traits so the HTTP layer can run
//! against PostgreSQL or the in-memory store.
//!
//! # Available Services
//!
//! - [`services::cart_service::CartService`] - Cart admission and persistence
//! - [`services::distributor_service::DistributorService`] - Distributor management
//! - [`services::supplier_service::SupplierService`] - Supplier management
//! - [`services::enterprise_service::EnterpriseService`] - Enterprise administration
//! - [`services::product_service::ProductService`] - Product catalog

pub mod services;
