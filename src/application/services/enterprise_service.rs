//! Enterprise administration service.

use crate::application::services::normalize_name;
use crate::domain::entities::{Enterprise, NewEnterprise, UpdateEnterprise};
use crate::domain::repositories::EnterpriseRepository;
use crate::error::AppError;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

/// Service for managing enterprises, including bulk edits from the admin list.
pub struct EnterpriseService<R: EnterpriseRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: EnterpriseRepository + ?Sized> EnterpriseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the name is blank or too long.
    /// Returns [`AppError::Conflict`] if the name is already taken.
    pub async fn create_enterprise(
        &self,
        mut new_enterprise: NewEnterprise,
    ) -> Result<Enterprise, AppError> {
        new_enterprise.name = normalize_name(&new_enterprise.name)?;

        if self
            .repository
            .find_by_name(&new_enterprise.name)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Enterprise already exists",
                json!({"name": new_enterprise.name}),
            ));
        }

        let enterprise = self.repository.create(new_enterprise).await?;
        tracing::info!(enterprise_id = enterprise.id, "Enterprise created");
        Ok(enterprise)
    }

    pub async fn list_enterprises(&self) -> Result<Vec<Enterprise>, AppError> {
        self.repository.list().await
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the enterprise does not exist.
    pub async fn get_enterprise(&self, id: i64) -> Result<Enterprise, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Enterprise not found", json!({"id": id})))
    }

    pub async fn update_enterprise(
        &self,
        id: i64,
        mut update: UpdateEnterprise,
    ) -> Result<Enterprise, AppError> {
        if let Some(name) = &update.name {
            update.name = Some(normalize_name(name)?);
        }
        self.repository.update(id, update).await
    }

    /// Applies several updates in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the batch is empty, names the same
    /// enterprise twice, or contains an update that changes nothing or
    /// carries an invalid name. Nothing is written in that case.
    pub async fn bulk_update(
        &self,
        updates: Vec<(i64, UpdateEnterprise)>,
    ) -> Result<Vec<Enterprise>, AppError> {
        if updates.is_empty() {
            return Err(AppError::bad_request("No enterprises to update", json!({})));
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(updates.len());

        for (id, mut update) in updates {
            if !seen.insert(id) {
                return Err(AppError::bad_request(
                    "Enterprise listed more than once",
                    json!({"id": id}),
                ));
            }
            if update.is_empty() {
                return Err(AppError::bad_request(
                    "Update contains no changes",
                    json!({"id": id}),
                ));
            }
            if let Some(name) = &update.name {
                update.name = Some(normalize_name(name)?);
            }
            normalized.push((id, update));
        }

        let updated = self.repository.update_many(normalized).await?;
        tracing::info!(count = updated.len(), "Enterprises bulk updated");
        Ok(updated)
    }

    pub async fn delete_enterprise(&self, id: i64) -> Result<(), AppError> {
        self.repository.delete(id).await?;
        tracing::info!(enterprise_id = id, "Enterprise deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockEnterpriseRepository;
    use chrono::Utc;

    fn enterprise(id: i64, name: &str) -> Enterprise {
        let now = Utc::now();
        Enterprise {
            id,
            name: name.to_string(),
            description: None,
            is_primary_producer: false,
            is_distributor: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn rename(name: &str) -> UpdateEnterprise {
        UpdateEnterprise {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bulk_update_applies_all() {
        let mut mock_repo = MockEnterpriseRepository::new();

        mock_repo
            .expect_update_many()
            .withf(|updates| {
                updates.len() == 2 && updates[0].1.name.as_deref() == Some("North Co-op")
            })
            .times(1)
            .returning(|updates| {
                Ok(updates
                    .into_iter()
                    .map(|(id, u)| enterprise(id, u.name.as_deref().unwrap_or("x")))
                    .collect())
            });

        let service = EnterpriseService::new(Arc::new(mock_repo));

        let result = service
            .bulk_update(vec![(1, rename(" North Co-op ")), (2, rename("South Co-op"))])
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].name, "South Co-op");
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_duplicate_ids() {
        let mut mock_repo = MockEnterpriseRepository::new();
        mock_repo.expect_update_many().times(0);

        let service = EnterpriseService::new(Arc::new(mock_repo));

        let result = service
            .bulk_update(vec![(1, rename("A")), (1, rename("B"))])
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_empty_change() {
        let mock_repo = MockEnterpriseRepository::new();
        let service = EnterpriseService::new(Arc::new(mock_repo));

        let result = service
            .bulk_update(vec![(1, UpdateEnterprise::default())])
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_bulk_update_rejects_empty_batch() {
        let mock_repo = MockEnterpriseRepository::new();
        let service = EnterpriseService::new(Arc::new(mock_repo));

        assert!(service.bulk_update(vec![]).await.is_err());
    }

    #[tokio::test]
    async fn test_create_enterprise_duplicate() {
        let mut mock_repo = MockEnterpriseRepository::new();
        mock_repo
            .expect_find_by_name()
            .returning(|name| Ok(Some(enterprise(1, name))));

        let service = EnterpriseService::new(Arc::new(mock_repo));

        let result = service
            .create_enterprise(NewEnterprise {
                name: "North Co-op".to_string(),
                description: None,
                is_primary_producer: true,
                is_distributor: false,
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }
}
