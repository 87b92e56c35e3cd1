//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod cart;
pub mod distributor;
pub mod enterprise;
pub mod health;
pub mod product;
pub mod supplier;
