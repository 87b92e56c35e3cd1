//! Distributor management service.

use crate::application::services::normalize_name;
use crate::domain::entities::{Distributor, NewDistributor, UpdateDistributor};
use crate::domain::repositories::DistributorRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for managing distributors.
///
/// Distributors referenced by an order can be deactivated but not deleted.
pub struct DistributorService<R: DistributorRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: DistributorRepository + ?Sized> DistributorService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a new distributor. New distributors start active.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name is blank or too long.
    /// Returns [`AppError::Conflict`] if the name is already taken.
    pub async fn create_distributor(
        &self,
        mut new_distributor: NewDistributor,
    ) -> Result<Distributor, AppError> {
        new_distributor.name = normalize_name(&new_distributor.name)?;

        if self
            .repository
            .find_by_name(&new_distributor.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Distributor already exists",
                json!({"name": new_distributor.name}),
            ));
        }

        let distributor = self.repository.create(new_distributor).await?;

        tracing::info!(
            distributor_id = distributor.id,
            name = %distributor.name,
            "Distributor created"
        );
        Ok(distributor)
    }

    /// Lists distributors ordered by name.
    pub async fn list_distributors(&self, only_active: bool) -> Result<Vec<Distributor>, AppError> {
        self.repository.list(only_active).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    pub async fn get_distributor(&self, id: i64) -> Result<Distributor, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Distributor not found", json!({"id": id})))
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a new name is blank or too long.
    /// Returns [`AppError::Conflict`] if the new name belongs to another distributor.
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    pub async fn update_distributor(
        &self,
        id: i64,
        mut update: UpdateDistributor,
    ) -> Result<Distributor, AppError> {
        if let Some(name) = &update.name {
            let name = normalize_name(name)?;
            if let Some(existing) = self.repository.find_by_name(&name).await?
                && existing.id != id
            {
                return Err(AppError::conflict(
                    "Distributor already exists",
                    json!({"name": name}),
                ));
            }
            update.name = Some(name);
        }

        self.repository.update(id, update).await
    }

    /// Deletes a distributor that no order refers to.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if any order is bound to the distributor.
    /// Returns [`AppError::NotFound`] if the distributor does not exist.
    pub async fn delete_distributor(&self, id: i64) -> Result<(), AppError> {
        let orders = self.repository.count_orders(id).await?;
        if orders > 0 {
            return Err(AppError::conflict(
                "Cannot delete distributor with existing orders",
                json!({"id": id, "orders": orders}),
            ));
        }

        self.repository.delete(id).await?;
        tracing::info!(distributor_id = id, "Distributor deleted");
        Ok(())
    }

    /// Activates or deactivates several distributors at once.
    ///
    /// Returns the number of distributors that were changed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `ids` is empty.
    pub async fn bulk_set_active(&self, ids: Vec<i64>, is_active: bool) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Err(AppError::bad_request(
                "At least one distributor id is required",
                json!({}),
            ));
        }

        let changed = self.repository.set_active_many(ids, is_active).await?;
        tracing::info!(changed, is_active, "Distributors bulk updated");
        Ok(changed)
    }
}
