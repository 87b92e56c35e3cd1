//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. The only rule-bearing code lives in
//! [`crate::domain::admission`].
//!
//! # Entity Types
//!
//! - [`Distributor`] - A hub through which products are sold
//! - [`Supplier`] - A producer of products
//! - [`Enterprise`] - Administrative record of a business in the network
//! - [`Product`] - A catalog item and the distributors carrying it
//! - [`Order`] / [`LineItem`] - A shopper's cart
//!
//! # Design Pattern
//!
//! Entities use separate structs for creation (`NewDistributor`, ...) and for
//! partial updates (`UpdateDistributor`, ...).

pub mod distributor;
pub mod enterprise;
pub mod order;
pub mod product;
pub mod supplier;

pub use distributor::{Distributor, NewDistributor, UpdateDistributor};
pub use enterprise::{Enterprise, NewEnterprise, UpdateEnterprise};
pub use order::{CartState, LineItem, MAX_QUANTITY, Order};
pub use product::{NewProduct, Product};
pub use supplier::{NewSupplier, Supplier, UpdateSupplier};
