//! DTOs for distributor endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Distributor, NewDistributor, UpdateDistributor};

/// Individual distributor information.
#[derive(Debug, Serialize)]
pub struct DistributorItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub pickup_address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Distributor> for DistributorItem {
    fn from(d: Distributor) -> Self {
        Self {
            id: d.id,
            name: d.name,
            description: d.description,
            email: d.email,
            pickup_address: d.pickup_address,
            is_active: d.is_active,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

/// Response containing list of distributors.
#[derive(Debug, Serialize)]
pub struct DistributorListResponse {
    pub items: Vec<DistributorItem>,
}

/// Request body for `POST /admin/distributors`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDistributorRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub pickup_address: Option<String>,
}

impl From<CreateDistributorRequest> for NewDistributor {
    fn from(req: CreateDistributorRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            email: req.email,
            pickup_address: req.pickup_address,
        }
    }
}

/// Request body for `PATCH /admin/distributors/{id}`.
///
/// Absent fields are left unchanged; `null` clears an optional field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDistributorRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub pickup_address: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl From<UpdateDistributorRequest> for UpdateDistributor {
    fn from(req: UpdateDistributorRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            email: req.email,
            pickup_address: req.pickup_address,
            is_active: req.is_active,
        }
    }
}

/// Request body for `POST /admin/distributors/bulk_update`.
#[derive(Debug, Deserialize, Validate)]
pub struct BulkUpdateDistributorsRequest {
    #[validate(length(min = 1))]
    pub ids: Vec<i64>,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub updated: u64,
}
