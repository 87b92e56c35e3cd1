//! DTOs for enterprise administration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Enterprise, NewEnterprise, UpdateEnterprise};

#[derive(Debug, Serialize)]
pub struct EnterpriseItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_primary_producer: bool,
    pub is_distributor: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Enterprise> for EnterpriseItem {
    fn from(e: Enterprise) -> Self {
        Self {
            id: e.id,
            name: e.name,
            description: e.description,
            is_primary_producer: e.is_primary_producer,
            is_distributor: e.is_distributor,
            is_active: e.is_active,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EnterpriseListResponse {
    pub items: Vec<EnterpriseItem>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnterpriseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_primary_producer: bool,
    #[serde(default)]
    pub is_distributor: bool,
}

impl From<CreateEnterpriseRequest> for NewEnterprise {
    fn from(req: CreateEnterpriseRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            is_primary_producer: req.is_primary_producer,
            is_distributor: req.is_distributor,
        }
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEnterpriseRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub is_primary_producer: Option<bool>,
    pub is_distributor: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<UpdateEnterpriseRequest> for UpdateEnterprise {
    fn from(req: UpdateEnterpriseRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            is_primary_producer: req.is_primary_producer,
            is_distributor: req.is_distributor,
            is_active: req.is_active,
        }
    }
}

/// One row of the admin bulk edit form.
///
/// `Serialize` lets validation errors echo the submitted rows.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BulkEnterpriseItem {
    pub id: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub is_primary_producer: Option<bool>,
    pub is_distributor: Option<bool>,
    pub is_active: Option<bool>,
}

impl BulkEnterpriseItem {
    pub fn into_update(self) -> (i64, UpdateEnterprise) {
        (
            self.id,
            UpdateEnterprise {
                name: self.name,
                description: None,
                is_primary_producer: self.is_primary_producer,
                is_distributor: self.is_distributor,
                is_active: self.is_active,
            },
        )
    }
}

/// Request body for `POST /admin/enterprises/bulk_update`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateEnterprisesRequest {
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub enterprises: Vec<BulkEnterpriseItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_request_validation() {
        let empty: BulkUpdateEnterprisesRequest =
            serde_json::from_str(r#"{"enterprises": []}"#).unwrap();
        assert!(empty.validate().is_err());

        let blank_name: BulkUpdateEnterprisesRequest =
            serde_json::from_str(r#"{"enterprises": [{"id": 1, "name": ""}]}"#).unwrap();
        assert!(blank_name.validate().is_err());

        let ok: BulkUpdateEnterprisesRequest =
            serde_json::from_str(r#"{"enterprises": [{"id": 1, "is_active": false}]}"#).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_bulk_item_into_update() {
        let item: BulkEnterpriseItem =
            serde_json::from_str(r#"{"id": 7, "is_distributor": true}"#).unwrap();

        let (id, update) = item.into_update();

        assert_eq!(id, 7);
        assert_eq!(update.is_distributor, Some(true));
        assert!(update.name.is_none());
        assert!(update.description.is_none());
    }
}
