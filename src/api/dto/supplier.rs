//! DTOs for supplier endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Supplier, UpdateSupplier};

#[derive(Debug, Serialize)]
pub struct SupplierItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Supplier> for SupplierItem {
    fn from(s: Supplier) -> Self {
        Self {
            id: s.id,
            name: s.name,
            description: s.description,
            email: s.email,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupplierListResponse {
    pub items: Vec<SupplierItem>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

/// Absent fields are left unchanged; `null` clears an optional field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub email: Option<Option<String>>,
}

impl From<UpdateSupplierRequest> for UpdateSupplier {
    fn from(req: UpdateSupplierRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            email: req.email,
        }
    }
}
