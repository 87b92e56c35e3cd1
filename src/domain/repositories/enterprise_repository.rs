//! Repository trait for enterprise management.

use crate::domain::entities::{Enterprise, NewEnterprise, UpdateEnterprise};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing enterprises.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnterpriseRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is already taken.
    async fn create(&self, new_enterprise: NewEnterprise) -> Result<Enterprise, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Enterprise>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Enterprise>, AppError>;

    async fn list(&self) -> Result<Vec<Enterprise>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the enterprise does not exist.
    async fn update(&self, id: i64, update: UpdateEnterprise) -> Result<Enterprise, AppError>;

    /// Applies several updates atomically: either all succeed or none do.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if any enterprise does not exist.
    async fn update_many(
        &self,
        updates: Vec<(i64, UpdateEnterprise)>,
    ) -> Result<Vec<Enterprise>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the enterprise does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}
