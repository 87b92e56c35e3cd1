//! DTOs for product endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::entities::Product;

#[derive(Debug, Serialize)]
pub struct ProductItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub supplier_id: Option<i64>,
    /// Distributors the product can be ordered through.
    pub distributor_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductItem {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            supplier_id: p.supplier_id,
            distributor_ids: p.distributor_ids.into_iter().collect(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub items: Vec<ProductItem>,
}

/// Query parameters for `GET /products`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Only list products carried by this distributor.
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub distributor_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub description: Option<String>,
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub distributor_ids: Vec<i64>,
}

/// Request body for `PUT /admin/products/{id}/distributors`.
#[derive(Debug, Deserialize)]
pub struct UpdateProductDistributorsRequest {
    pub distributor_ids: Vec<i64>,
}
