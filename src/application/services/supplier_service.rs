//! Supplier management service.

use crate::application::services::normalize_name;
use crate::domain::entities::{NewSupplier, Supplier, UpdateSupplier};
use crate::domain::repositories::SupplierRepository;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;

/// Service for managing suppliers.
pub struct SupplierService<R: SupplierRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: SupplierRepository + ?Sized> SupplierService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Creates a new supplier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name is blank or too long.
    /// Returns [`AppError::Conflict`] if the name is already taken.
    pub async fn create_supplier(
        &self,
        name: String,
        description: Option<String>,
        email: Option<String>,
    ) -> Result<Supplier, AppError> {
        let name = normalize_name(&name)?;

        if self.repository.find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict(
                "Supplier already exists",
                json!({"name": name}),
            ));
        }

        let supplier = self
            .repository
            .create(NewSupplier {
                name,
                description,
                email,
            })
            .await?;

        tracing::info!(supplier_id = supplier.id, name = %supplier.name, "Supplier created");
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        self.repository.list().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the supplier does not exist.
    pub async fn get_supplier(&self, id: i64) -> Result<Supplier, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Supplier not found", json!({"id": id})))
    }

    pub async fn update_supplier(
        &self,
        id: i64,
        mut update: UpdateSupplier,
    ) -> Result<Supplier, AppError> {
        if let Some(name) = &update.name {
            update.name = Some(normalize_name(name)?);
        }
        self.repository.update(id, update).await
    }

    pub async fn delete_supplier(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        tracing::info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockSupplierRepository;
    use chrono::Utc;

    fn supplier(id: i64, name: &str) -> Supplier {
        Supplier {
            id,
            name: name.to_string(),
            description: None,
            email: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_supplier_trims_name() {
        let mut mock_repo = MockSupplierRepository::new();

        mock_repo
            .expect_find_by_name()
            .withf(|name| name == "Hillside Farm")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|new| new.name == "Hillside Farm")
            .times(1)
            .returning(|new| Ok(supplier(1, &new.name)));

        let service = SupplierService::new(Arc::new(mock_repo));

        let created = service
            .create_supplier("  Hillside Farm ".to_string(), None, None)
            .await
            .unwrap();

        assert_eq!(created.name, "Hillside Farm");
    }

    #[tokio::test]
    async fn test_create_supplier_duplicate() {
        let mut mock_repo = MockSupplierRepository::new();

        mock_repo
            .expect_find_by_name()
            .times(1)
            .returning(|name| Ok(Some(supplier(1, name))));

        let service = SupplierService::new(Arc::new(mock_repo));

        let result = service
            .create_supplier("Hillside Farm".to_string(), None, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_supplier_not_found() {
        let mut mock_repo = MockSupplierRepository::new();
        mock_repo.expect_find_by_id().returning(|_| Ok(None));

        let service = SupplierService::new(Arc::new(mock_repo));

        let result = service.get_supplier(42).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_supplier_rejects_blank_name() {
        let mock_repo = MockSupplierRepository::new();
        let service = SupplierService::new(Arc::new(mock_repo));

        let result = service
            .update_supplier(
                1,
                UpdateSupplier {
                    name: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }
}
