//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access and are implemented by the
//! infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - An in-memory implementation lives in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`DistributorRepository`] - Distributor management
//! - [`SupplierRepository`] - Supplier management
//! - [`EnterpriseRepository`] - Enterprise management
//! - [`ProductRepository`] - Catalog and distributor availability
//! - [`OrderRepository`] - Carts and line items

pub mod distributor_repository;
pub mod enterprise_repository;
pub mod order_repository;
pub mod product_repository;
pub mod supplier_repository;

pub use distributor_repository::DistributorRepository;
pub use enterprise_repository::EnterpriseRepository;
pub use order_repository::OrderRepository;
pub use product_repository::ProductRepository;
pub use supplier_repository::SupplierRepository;

#[cfg(test)]
pub use distributor_repository::MockDistributorRepository;
#[cfg(test)]
pub use enterprise_repository::MockEnterpriseRepository;
#[cfg(test)]
pub use order_repository::MockOrderRepository;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use supplier_repository::MockSupplierRepository;
