//! Business logic services for the application layer.

pub mod cart_service;
pub mod distributor_service;
pub mod enterprise_service;
pub mod product_service;
pub mod supplier_service;

pub use cart_service::{CartOutcome, CartService, PopulateItems};
pub use distributor_service::DistributorService;
pub use enterprise_service::EnterpriseService;
pub use product_service::ProductService;
pub use supplier_service::SupplierService;

use crate::error::AppError;
use serde_json::json;

/// Maximum length of any catalog name.
const MAX_NAME_LENGTH: usize = 255;

/// Trims a catalog name and checks its length.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the trimmed name is empty or longer
/// than 255 characters.
pub(crate) fn normalize_name(name: &str) -> Result<String, AppError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();

    if len == 0 || len > MAX_NAME_LENGTH {
        return Err(AppError::bad_request(
            "Invalid name length",
            json!({"min": 1, "max": MAX_NAME_LENGTH}),
        ));
    }

    Ok(trimmed.to_string())
}
