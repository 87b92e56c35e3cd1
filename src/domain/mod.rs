//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`admission`] - Distributor-scoped cart admission rules
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - The admission guard is synchronous and side-effect free; orchestration
//!   lives in [`crate::application::services::CartService`]
//!
//! # Populate Flow
//!
//! 1. HTTP handler resolves the cart token from the `cart_token` cookie
//! 2. [`crate::application::services::CartService`] loads or creates the order
//! 3. Distributor and products are resolved through the repositories
//! 4. [`admission::admit_items`] decides and returns the updated order
//! 5. The order is persisted via [`repositories::OrderRepository::save`]

pub mod admission;
pub mod entities;
pub mod repositories;
