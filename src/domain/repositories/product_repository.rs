//! Repository trait for the product catalog.

use crate::domain::entities::{NewProduct, Product};
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Repository interface for products and their distributor availability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Creates a product together with its distributor links.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the name is taken or a referenced
    /// supplier/distributor does not exist.
    async fn create(&self, new_product: NewProduct) -> Result<Product, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError>;

    /// Loads every product whose id is listed. Missing ids are skipped.
    async fn find_many(&self, ids: Vec<i64>) -> Result<Vec<Product>, AppError>;

    /// Lists products ordered by name, optionally only those carried by a distributor.
    async fn list(&self, distributor_id: Option<i64>) -> Result<Vec<Product>, AppError>;

    /// Replaces the set of distributors carrying the product.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the product does not exist, and
    /// [`AppError::Conflict`] if a cart bound to a dropped distributor still
    /// holds the product.
    async fn set_distributors(
        &self,
        id: i64,
        distributor_ids: BTreeSet<i64>,
    ) -> Result<Product, AppError>;
}
