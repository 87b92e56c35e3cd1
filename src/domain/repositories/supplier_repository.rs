//! Repository trait for supplier management.

use crate::domain::entities::{NewSupplier, Supplier, UpdateSupplier};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing suppliers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is already taken.
    async fn create(&self, new_supplier: NewSupplier) -> Result<Supplier, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Supplier>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Supplier>, AppError>;

    async fn list(&self) -> Result<Vec<Supplier>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the supplier does not exist.
    async fn update(&self, id: i64, update: UpdateSupplier) -> Result<Supplier, AppError>;

    /// Deletes a supplier. Its products remain, without a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the supplier does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
