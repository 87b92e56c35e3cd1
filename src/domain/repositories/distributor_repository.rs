//! Repository trait for distributor management.

use crate::domain::entities::{Distributor, NewDistributor, UpdateDistributor};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing distributors.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDistributorRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryStore`] - In-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistributorRepository: Send + Sync {
    /// Creates a new distributor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_distributor: NewDistributor) -> Result<Distributor, AppError>;

    /// Finds a distributor by its ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Distributor>, AppError>;

    /// Finds a distributor by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Distributor>, AppError>;

    /// Lists distributors ordered by name.
    ///
    /// # Arguments
    ///
    /// - `only_active` - If true, returns only active distributors
    async fn list(&self, only_active: bool) -> Result<Vec<Distributor>, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    /// Returns [`AppError::Conflict`] if the new name is already taken.
    async fn update(&self, id: i64, update: UpdateDistributor) -> Result<Distributor, AppError>;

    /// Deletes a distributor.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Sets `is_active` on every listed distributor in one step.
    ///
    /// Returns the number of distributors changed. Unknown ids are ignored.
    async fn set_active_many(&self, ids: Vec<i64>, is_active: bool) -> Result<u64, AppError>;

    /// Counts orders bound to the distributor.
    async fn count_orders(&self, id: i64) -> Result<i64, AppError>;
}
