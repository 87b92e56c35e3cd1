//! Utility functions shared by the HTTP layer.
//!
//! - [`cart_token`] - Cart token generation and cookie handling

pub mod cart_token;
