//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//! Rows are decoded through `FromRow` structs and converted into entities.
//!
//! # Repositories
//!
//! - [`PgDistributorRepository`] - Distributor storage
//! - [`PgSupplierRepository`] - Supplier storage
//! - [`PgEnterpriseRepository`] - Enterprise storage
//! - [`PgProductRepository`] - Products and `product_distributions`
//! - [`PgOrderRepository`] - Orders and line items

pub mod pg_distributor_repository;
pub mod pg_enterprise_repository;
pub mod pg_order_repository;
pub mod pg_product_repository;
pub mod pg_supplier_repository;

pub use pg_distributor_repository::PgDistributorRepository;
pub use pg_enterprise_repository::PgEnterpriseRepository;
pub use pg_order_repository::PgOrderRepository;
pub use pg_product_repository::PgProductRepository;
pub use pg_supplier_repository::PgSupplierRepository;
